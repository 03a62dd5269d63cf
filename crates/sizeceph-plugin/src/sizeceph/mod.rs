//! The SizeCeph always-decode (k=4, m=5) erasure code — §4.1-§4.6

pub mod constants;
mod decoder;
mod encoder;

use crate::align::get_chunk_size;
use crate::facade::ErasureCodeInterface;
use crate::profile::{validate_sizeceph_profile, Profile, SizeCephProfile};
use crate::shard::{ShardMap, ShardSet};
use sizeceph_common::Result;

use constants::{A, K, LEGACY_K, LEGACY_M, M, N};

/// A constructed SizeCeph codec instance.
///
/// Immutable after construction (§5): the profile is absorbed once in
/// [`SizeCephCodec::new`] and never mutated again.
pub struct SizeCephCodec {
    profile: SizeCephProfile,
}

impl SizeCephCodec {
    /// Validate `profile` and construct a codec instance.
    ///
    /// # Errors
    /// Returns [`sizeceph_common::Error::Invalid`] if `profile` names a
    /// `technique`, `k`, or `m` other than SizeCeph's own (in either the
    /// standard or `force_all_chunks` legacy shape).
    pub fn new(profile: &Profile) -> Result<Self> {
        let parsed = validate_sizeceph_profile(profile, K, M, LEGACY_K, LEGACY_M)?;
        Ok(Self { profile: parsed })
    }

    #[must_use]
    pub const fn force_all_chunks(&self) -> bool {
        self.profile.force_all_chunks
    }
}

impl ErasureCodeInterface for SizeCephCodec {
    fn init(&self, profile: &Profile) -> Result<()> {
        validate_sizeceph_profile(profile, K, M, LEGACY_K, LEGACY_M).map(|_| ())
    }

    fn get_chunk_count(&self) -> u8 {
        N
    }

    fn get_data_chunk_count(&self) -> u8 {
        K
    }

    fn get_coding_chunk_count(&self) -> u8 {
        M
    }

    fn get_alignment(&self) -> u64 {
        A
    }

    fn get_chunk_size(&self, stripe_width: u64) -> u64 {
        get_chunk_size(stripe_width, u64::from(K), A)
    }

    fn encode(&self, want_to_encode: &ShardSet, input: &[u8]) -> Result<ShardMap> {
        encoder::encode(want_to_encode, input)
    }

    fn decode(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<ShardMap> {
        decoder::decode(want_to_read, chunks, chunk_size)
    }

    fn decode_concat(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<Vec<u8>> {
        decoder::decode_concat(want_to_read, chunks, chunk_size)
    }

    fn minimum_to_decode(&self, want_to_read: &ShardSet, available: &ShardSet) -> Result<ShardSet> {
        decoder::minimum_to_decode(want_to_read, available)
    }

    fn minimum_to_decode_with_cost(
        &self,
        want_to_read: &ShardSet,
        available: &ShardSet,
        cost: &std::collections::BTreeMap<crate::shard::ShardId, u64>,
    ) -> Result<ShardSet> {
        decoder::minimum_to_decode_with_cost(want_to_read, available, cost)
    }

    // apply_delta, encode_chunks, decode_chunks, encode_delta,
    // get_supported_optimizations: default trait implementations match §4.5
    // exactly, so SizeCephCodec need not override them.
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SizeCephCodec {
        SizeCephCodec::new(&Profile::new()).unwrap()
    }

    #[test]
    fn rejects_wrong_technique() {
        let mut profile = Profile::new();
        profile.insert("technique".to_string(), "simple_xor".to_string());
        assert!(SizeCephCodec::new(&profile).is_err());
    }

    #[test]
    fn accessors_match_spec_constants() {
        let c = codec();
        assert_eq!(c.get_chunk_count(), 9);
        assert_eq!(c.get_data_chunk_count(), 4);
        assert_eq!(c.get_coding_chunk_count(), 5);
        assert_eq!(c.get_sub_chunk_count(), 1);
        assert_eq!(c.get_alignment(), 4);
        assert_eq!(c.get_minimum_granularity(), 4);
        assert_eq!(c.get_chunk_mapping(), (0u8..9).collect::<Vec<_>>());
    }

    #[test]
    fn chunk_size_scenario_2() {
        assert_eq!(codec().get_chunk_size(20), 8);
    }

    #[test]
    fn scenario_3_all_present_round_trip() {
        let c = codec();
        let input: Vec<u8> = (0u8..=255).cycle().take(512).collect();
        assert_eq!(c.get_chunk_size(512), 128);

        let full: ShardSet = (0..9).collect();
        let shards = c.encode(&full, &input).unwrap();
        assert!(shards.values().all(|s| s.len() == 128));

        let want: ShardSet = (0..4).collect();
        let out = c.decode_concat(&want, &shards, None).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn scenario_4_insufficient_shards_is_not_found() {
        let c = codec();
        let input: Vec<u8> = (0u8..=255).cycle().take(512).collect();
        let full: ShardSet = (0..9).collect();
        let mut shards = c.encode(&full, &input).unwrap();
        shards.remove(&8);

        let want: ShardSet = (0..4).collect();
        assert!(c.decode(&want, &shards, None).is_err());
    }

    #[test]
    fn scenario_6_empty_input_round_trip() {
        let c = codec();
        let full: ShardSet = (0..9).collect();
        let shards = c.encode(&full, &[]).unwrap();
        assert_eq!(shards.len(), 9);
        assert!(shards.values().all(Vec::is_empty));
    }

    #[test]
    fn encode_chunks_and_decode_chunks_are_not_supported() {
        let c = codec();
        let mut map = ShardMap::new();
        assert!(c.encode_chunks(&ShardSet::new(), &mut map).is_err());
        assert!(c.decode_chunks(&ShardSet::new(), &mut map).is_err());
    }

    #[test]
    fn encode_delta_is_always_empty() {
        let c = codec();
        assert!(c.encode_delta(&[1, 2, 3], &[4, 5, 6], &ShardSet::new()).is_empty());
    }

    #[test]
    fn apply_delta_clears_the_output_map() {
        let c = codec();
        let mut map = ShardMap::new();
        map.insert(0, vec![1, 2, 3]);
        c.apply_delta(&[], &mut map);
        assert!(map.is_empty());
    }

    #[test]
    fn supported_optimizations_excludes_partial_and_delta_flags() {
        let c = codec();
        let flags = c.get_supported_optimizations();
        assert_eq!(
            flags,
            crate::optimizations::OPTIMIZED_EC_SUPPORTED
                | crate::optimizations::ZERO_PADDING_OPTIMIZATION
        );
    }

    #[test]
    fn minimum_to_decode_with_cost_matches_plain_minimum_to_decode() {
        let c = codec();
        let cost: std::collections::BTreeMap<crate::shard::ShardId, u64> =
            (0..9).map(|id| (id, u64::from(id))).collect();
        let full: ShardSet = (0..9).collect();

        let partial: ShardSet = (0..8).collect();
        assert!(c.minimum_to_decode_with_cost(&full, &partial, &cost).is_err());

        assert_eq!(
            c.minimum_to_decode_with_cost(&full, &full, &cost).unwrap(),
            c.minimum_to_decode(&full, &full).unwrap()
        );
    }
}
