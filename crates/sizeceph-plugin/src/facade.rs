//! The shared plugin façade — §4.6 / §6
//!
//! Both codecs in this plugin (SizeCeph and simple XOR) expose the same
//! operation surface to the host. This trait names that surface once;
//! `sizeceph::SizeCephCodec` and `xor::XorCodec` each implement it, and
//! [`PluginCodec`] wraps either behind one type the way the teacher's
//! `CodecBackend` wraps its MDS/LRC backends.

use crate::profile::Profile;
use crate::rule::CrushRuleSink;
use crate::shard::{LegacyCostMap, LegacyShardMap, LegacyShardSet, ShardId, ShardMap, ShardSet};
use crate::sizeceph::SizeCephCodec;
use crate::xor::XorCodec;
use sizeceph_common::{Error, Result};
use std::collections::BTreeMap;

/// Operations every codec in this plugin supports, named after §4 and §6.
pub trait ErasureCodeInterface {
    /// `init(profile, err)`: validate and absorb construction-time
    /// parameters. Implementations are expected to perform this during
    /// construction; this method re-validates an already-built instance's
    /// profile and is here for host call-sites that re-run `init`.
    ///
    /// # Errors
    /// Returns [`Error::Invalid`] if `profile` conflicts with this
    /// instance's fixed technique/k/m.
    fn init(&self, profile: &Profile) -> Result<()>;

    /// `get_chunk_count() → N`.
    fn get_chunk_count(&self) -> u8;
    /// `get_data_chunk_count() → K`.
    fn get_data_chunk_count(&self) -> u8;
    /// `get_coding_chunk_count() → M`.
    fn get_coding_chunk_count(&self) -> u8;
    /// `get_sub_chunk_count() → 1`.
    fn get_sub_chunk_count(&self) -> u8 {
        1
    }
    /// `get_alignment() → A`.
    fn get_alignment(&self) -> u64;
    /// `get_minimum_granularity() → A`.
    fn get_minimum_granularity(&self) -> u64 {
        self.get_alignment()
    }
    /// `get_chunk_size(stripe_width)`, as defined in §4.2.
    fn get_chunk_size(&self, stripe_width: u64) -> u64;
    /// `get_chunk_mapping()`: the identity permutation `[0, N)`.
    fn get_chunk_mapping(&self) -> Vec<ShardId> {
        (0..self.get_chunk_count()).collect()
    }

    /// `create_rule(name, crush, err) → int`.
    ///
    /// # Errors
    /// Propagates [`crate::rule::CrushRuleSink::add_erasure_rule`] errors.
    fn create_rule(&self, name: &str, crush: &mut dyn CrushRuleSink) -> Result<i32> {
        crate::rule::create_rule(crush, name, self.get_data_chunk_count(), self.get_coding_chunk_count())
    }

    /// `encode(want_to_encode, input, out) → status`.
    ///
    /// # Errors
    /// See the implementing codec's module documentation.
    fn encode(&self, want_to_encode: &ShardSet, input: &[u8]) -> Result<ShardMap>;

    /// `decode(want_to_read, chunks, out, chunk_size) → status`.
    ///
    /// # Errors
    /// See the implementing codec's module documentation.
    fn decode(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<ShardMap>;

    /// `decode_concat(want_to_read, chunks, chunk_size) → bytes`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::decode`].
    fn decode_concat(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<Vec<u8>>;

    /// `minimum_to_decode(want_to_read, available) → minimum_set`.
    ///
    /// # Errors
    /// See the implementing codec's module documentation.
    fn minimum_to_decode(&self, want_to_read: &ShardSet, available: &ShardSet) -> Result<ShardSet>;

    /// `minimum_to_decode_with_cost`: cost-aware signature, ignored by both
    /// codecs in this plugin (neither policy is cost-determined).
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::minimum_to_decode`].
    fn minimum_to_decode_with_cost(
        &self,
        want_to_read: &ShardSet,
        available: &ShardSet,
        _cost: &BTreeMap<ShardId, u64>,
    ) -> Result<ShardSet> {
        self.minimum_to_decode(want_to_read, available)
    }

    /// `encode_chunks` (shard-ptr in/out): unsupported for both codecs.
    ///
    /// # Errors
    /// Always returns [`Error::NotSupported`].
    fn encode_chunks(&self, _want_to_encode: &ShardSet, _chunks: &mut ShardMap) -> Result<()> {
        Err(Error::not_supported("encode_chunks is not implemented"))
    }

    /// `decode_chunks`: unsupported for both codecs.
    ///
    /// # Errors
    /// Always returns [`Error::NotSupported`].
    fn decode_chunks(&self, _want_to_read: &ShardSet, _chunks: &mut ShardMap) -> Result<()> {
        Err(Error::not_supported("decode_chunks is not implemented"))
    }

    /// `encode_delta`: produces an empty delta buffer. No representable
    /// delta exists for either codec's transformation.
    fn encode_delta(&self, _old_data: &[u8], _new_data: &[u8], _chunk_ids: &ShardSet) -> Vec<u8> {
        Vec::new()
    }

    /// `apply_delta`: clears the output map. Overridden by [`XorCodec`],
    /// whose delta application is an identity-matrix no-op on the map it is
    /// given rather than a hard clear.
    fn apply_delta(&self, _delta: &[u8], out: &mut ShardMap) {
        out.clear();
    }

    /// `get_supported_optimizations()`.
    fn get_supported_optimizations(&self) -> u32 {
        crate::optimizations::supported_optimizations()
    }
}

/// Legacy, plain-integer-keyed signatures, implemented once as bijective
/// shells over the modern trait (P8). Blanket-implemented for every
/// [`ErasureCodeInterface`] so neither codec needs to restate it.
pub trait LegacyErasureCodeInterface: ErasureCodeInterface {
    /// Legacy `minimum_to_decode`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::minimum_to_decode`].
    fn minimum_to_decode_legacy(
        &self,
        want_to_read: &LegacyShardSet,
        available: &LegacyShardSet,
    ) -> Result<LegacyShardSet> {
        let want = crate::shard::shard_set_from_legacy(want_to_read)?;
        let available = crate::shard::shard_set_from_legacy(available)?;
        self.minimum_to_decode(&want, &available)
            .map(|set| crate::shard::shard_set_to_legacy(&set))
    }

    /// Legacy `minimum_to_decode_with_cost`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::minimum_to_decode_with_cost`].
    fn minimum_to_decode_with_cost_legacy(
        &self,
        want_to_read: &LegacyShardSet,
        available: &LegacyShardSet,
        cost: &LegacyCostMap,
    ) -> Result<LegacyShardSet> {
        let want = crate::shard::shard_set_from_legacy(want_to_read)?;
        let available = crate::shard::shard_set_from_legacy(available)?;
        let cost = crate::shard::cost_map_from_legacy(cost)?;
        self.minimum_to_decode_with_cost(&want, &available, &cost)
            .map(|set| crate::shard::shard_set_to_legacy(&set))
    }

    /// Legacy `encode`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::encode`].
    fn encode_legacy(&self, want_to_encode: &LegacyShardSet, input: &[u8]) -> Result<LegacyShardMap> {
        let want = crate::shard::shard_set_from_legacy(want_to_encode)?;
        self.encode(&want, input)
            .map(crate::shard::shard_map_to_legacy)
    }

    /// Legacy `decode`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::decode`].
    fn decode_legacy(
        &self,
        want_to_read: &LegacyShardSet,
        chunks: LegacyShardMap,
        chunk_size: Option<usize>,
    ) -> Result<LegacyShardMap> {
        let want = crate::shard::shard_set_from_legacy(want_to_read)?;
        let chunks = crate::shard::shard_map_from_legacy(chunks)?;
        self.decode(&want, &chunks, chunk_size)
            .map(crate::shard::shard_map_to_legacy)
    }

    /// Legacy `decode_concat`.
    ///
    /// # Errors
    /// See [`ErasureCodeInterface::decode_concat`].
    fn decode_concat_legacy(
        &self,
        want_to_read: &LegacyShardSet,
        chunks: LegacyShardMap,
        chunk_size: Option<usize>,
    ) -> Result<Vec<u8>> {
        let want = crate::shard::shard_set_from_legacy(want_to_read)?;
        let chunks = crate::shard::shard_map_from_legacy(chunks)?;
        self.decode_concat(&want, &chunks, chunk_size)
    }
}

impl<T: ErasureCodeInterface + ?Sized> LegacyErasureCodeInterface for T {}

/// Wraps either codec behind one type, mirroring the teacher's
/// `CodecBackend` enum in `codec.rs`.
pub enum PluginCodec {
    SizeCeph(SizeCephCodec),
    Xor(XorCodec),
}

impl PluginCodec {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SizeCeph(_) => "sizeceph",
            Self::Xor(_) => "simple_xor",
        }
    }
}

impl ErasureCodeInterface for PluginCodec {
    fn init(&self, profile: &Profile) -> Result<()> {
        match self {
            Self::SizeCeph(c) => c.init(profile),
            Self::Xor(c) => c.init(profile),
        }
    }

    fn get_chunk_count(&self) -> u8 {
        match self {
            Self::SizeCeph(c) => c.get_chunk_count(),
            Self::Xor(c) => c.get_chunk_count(),
        }
    }

    fn get_data_chunk_count(&self) -> u8 {
        match self {
            Self::SizeCeph(c) => c.get_data_chunk_count(),
            Self::Xor(c) => c.get_data_chunk_count(),
        }
    }

    fn get_coding_chunk_count(&self) -> u8 {
        match self {
            Self::SizeCeph(c) => c.get_coding_chunk_count(),
            Self::Xor(c) => c.get_coding_chunk_count(),
        }
    }

    fn get_alignment(&self) -> u64 {
        match self {
            Self::SizeCeph(c) => c.get_alignment(),
            Self::Xor(c) => c.get_alignment(),
        }
    }

    fn get_chunk_size(&self, stripe_width: u64) -> u64 {
        match self {
            Self::SizeCeph(c) => c.get_chunk_size(stripe_width),
            Self::Xor(c) => c.get_chunk_size(stripe_width),
        }
    }

    fn encode(&self, want_to_encode: &ShardSet, input: &[u8]) -> Result<ShardMap> {
        match self {
            Self::SizeCeph(c) => c.encode(want_to_encode, input),
            Self::Xor(c) => c.encode(want_to_encode, input),
        }
    }

    fn decode(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<ShardMap> {
        match self {
            Self::SizeCeph(c) => c.decode(want_to_read, chunks, chunk_size),
            Self::Xor(c) => c.decode(want_to_read, chunks, chunk_size),
        }
    }

    fn decode_concat(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<Vec<u8>> {
        match self {
            Self::SizeCeph(c) => c.decode_concat(want_to_read, chunks, chunk_size),
            Self::Xor(c) => c.decode_concat(want_to_read, chunks, chunk_size),
        }
    }

    fn minimum_to_decode(&self, want_to_read: &ShardSet, available: &ShardSet) -> Result<ShardSet> {
        match self {
            Self::SizeCeph(c) => c.minimum_to_decode(want_to_read, available),
            Self::Xor(c) => c.minimum_to_decode(want_to_read, available),
        }
    }

    fn apply_delta(&self, delta: &[u8], out: &mut ShardMap) {
        match self {
            Self::SizeCeph(c) => c.apply_delta(delta, out),
            Self::Xor(c) => c.apply_delta(delta, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::shard::{shard_map_to_legacy, shard_set_to_legacy};

    /// P8: every deprecated integer-keyed signature returns the same
    /// logical result as the modern signature, on the same inputs,
    /// converted bijectively — exercised end-to-end through `PluginCodec`
    /// for both the SizeCeph and XOR techniques.
    #[test]
    fn legacy_sizeceph_round_trip_matches_modern() {
        let codec = PluginCodec::SizeCeph(crate::sizeceph::SizeCephCodec::new(&Profile::new()).unwrap());
        let input: Vec<u8> = (0u8..=255).cycle().take(256).collect();

        let full: ShardSet = (0..codec.get_chunk_count()).collect();
        let modern_shards = codec.encode(&full, &input).unwrap();
        let legacy_shards = codec
            .encode_legacy(&shard_set_to_legacy(&full), &input)
            .unwrap();
        assert_eq!(legacy_shards, shard_map_to_legacy(modern_shards.clone()));

        let want: ShardSet = (0..codec.get_data_chunk_count()).collect();
        let modern_decoded = codec.decode(&want, &modern_shards, None).unwrap();
        let legacy_decoded = codec
            .decode_legacy(
                &shard_set_to_legacy(&want),
                shard_map_to_legacy(modern_shards.clone()),
                None,
            )
            .unwrap();
        assert_eq!(legacy_decoded, shard_map_to_legacy(modern_decoded));

        let modern_concat = codec.decode_concat(&want, &modern_shards, None).unwrap();
        let legacy_concat = codec
            .decode_concat_legacy(
                &shard_set_to_legacy(&want),
                shard_map_to_legacy(modern_shards.clone()),
                None,
            )
            .unwrap();
        assert_eq!(legacy_concat, modern_concat);

        let available = full.clone();
        let modern_min = codec.minimum_to_decode(&want, &available).unwrap();
        let legacy_min = codec
            .minimum_to_decode_legacy(&shard_set_to_legacy(&want), &shard_set_to_legacy(&available))
            .unwrap();
        assert_eq!(legacy_min, shard_set_to_legacy(&modern_min));

        let cost: BTreeMap<ShardId, u64> = full.iter().map(|&id| (id, u64::from(id))).collect();
        let legacy_cost: crate::shard::LegacyCostMap =
            cost.iter().map(|(&id, &c)| (i32::from(id), c)).collect();
        let modern_min_cost = codec
            .minimum_to_decode_with_cost(&want, &available, &cost)
            .unwrap();
        let legacy_min_cost = codec
            .minimum_to_decode_with_cost_legacy(
                &shard_set_to_legacy(&want),
                &shard_set_to_legacy(&available),
                &legacy_cost,
            )
            .unwrap();
        assert_eq!(legacy_min_cost, shard_set_to_legacy(&modern_min_cost));
    }

    #[test]
    fn legacy_xor_round_trip_matches_modern() {
        let codec = PluginCodec::Xor(crate::xor::XorCodec::new(&Profile::new()).unwrap());
        let input = vec![0x01, 0x02, 0x03, 0x04, 0x10, 0x20, 0x30, 0x40];

        let full: ShardSet = (0..codec.get_chunk_count()).collect();
        let modern_shards = codec.encode(&full, &input).unwrap();
        let legacy_shards = codec
            .encode_legacy(&shard_set_to_legacy(&full), &input)
            .unwrap();
        assert_eq!(legacy_shards, shard_map_to_legacy(modern_shards.clone()));

        let mut erased = modern_shards.clone();
        erased.remove(&1);
        let want: ShardSet = [1].into_iter().collect();
        let modern_decoded = codec.decode(&want, &erased, None).unwrap();
        let legacy_decoded = codec
            .decode_legacy(&shard_set_to_legacy(&want), shard_map_to_legacy(erased), None)
            .unwrap();
        assert_eq!(legacy_decoded, shard_map_to_legacy(modern_decoded));
    }
}
