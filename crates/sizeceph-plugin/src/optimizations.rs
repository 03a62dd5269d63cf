//! Supported-optimizations flags — §4.6 `get_supported_optimizations`
//!
//! No crate in this workspace's dependency tree reaches for `bitflags` for
//! this kind of small, fixed flag set, so this follows the same plain-const
//! pattern rather than adding a dependency with no other use.

/// The transformation can be applied as an optimized erasure-code path
/// rather than the host's generic slow path.
pub const OPTIMIZED_EC_SUPPORTED: u32 = 1 << 0;
/// Zero-padding of a short final stripe is handled internally.
pub const ZERO_PADDING_OPTIMIZATION: u32 = 1 << 1;
/// Partial reads of a subset of a shard are supported. Never set here: the
/// native transform has no addressable sub-chunk structure.
pub const PARTIAL_READ_OPTIMIZATION: u32 = 1 << 2;
/// Partial writes (in-place updates of part of a stripe) are supported.
/// Never set here, for the same reason as [`PARTIAL_READ_OPTIMIZATION`].
pub const PARTIAL_WRITE_OPTIMIZATION: u32 = 1 << 3;
/// Parity can be updated incrementally via a delta rather than a full
/// re-encode. Never set here: SizeCeph's transform is non-linear and XOR's
/// `apply_delta` is only ever identity.
pub const PARITY_DELTA_OPTIMIZATION: u32 = 1 << 4;

/// The flag set both codecs in this plugin report: optimized-EC support and
/// zero-padding, with every partial-read/write/delta bit cleared.
#[must_use]
pub const fn supported_optimizations() -> u32 {
    OPTIMIZED_EC_SUPPORTED | ZERO_PADDING_OPTIMIZATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_exactly_the_two_documented_flags() {
        let flags = supported_optimizations();
        assert_eq!(flags & OPTIMIZED_EC_SUPPORTED, OPTIMIZED_EC_SUPPORTED);
        assert_eq!(
            flags & ZERO_PADDING_OPTIMIZATION,
            ZERO_PADDING_OPTIMIZATION
        );
        assert_eq!(flags & PARTIAL_READ_OPTIMIZATION, 0);
        assert_eq!(flags & PARTIAL_WRITE_OPTIMIZATION, 0);
        assert_eq!(flags & PARITY_DELTA_OPTIMIZATION, 0);
    }
}
