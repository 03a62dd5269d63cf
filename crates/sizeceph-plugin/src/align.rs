//! Chunk-size and alignment arithmetic
//!
//! Translates between the host's stripe width, the per-shard chunk size it
//! is promised, and a codec's internal block alignment. The identity that
//! must hold for every stripe width is:
//!
//! ```text
//! data_shards * chunk_size(stripe_width) == round_up(stripe_width, data_shards * alignment)
//! ```

/// Round `value` up to the nearest multiple of `multiple`.
///
/// `multiple` must be non-zero; `value = 0` rounds to `0`.
#[must_use]
pub fn round_up(value: u64, multiple: u64) -> u64 {
    debug_assert!(multiple > 0, "alignment multiple must be non-zero");
    if value == 0 {
        return 0;
    }
    value.div_ceil(multiple) * multiple
}

/// Per-shard chunk size for a `data_shards`-way split with `alignment`-byte
/// internal blocks, given the caller's logical `stripe_width`.
///
/// `data_shards * get_chunk_size(..) == round_up(stripe_width, data_shards * alignment)`
/// holds for every `stripe_width`, which is exactly what `get_chunk_size`
/// is specified to guarantee.
#[must_use]
pub fn get_chunk_size(stripe_width: u64, data_shards: u64, alignment: u64) -> u64 {
    let stride = data_shards * alignment;
    round_up(stripe_width, stride) / data_shards
}
