//! Shard identifiers and shard maps
//!
//! A shard-id is a small non-negative integer in `[0, N)`. Shard maps are
//! sparse over `[0, N)`: callers may populate or request any subset.
//!
//! [`ShardMap`] is a `BTreeMap` rather than a `HashMap` so that iterating
//! it naturally yields ascending shard-id order — exactly the order
//! `decode_concat` needs when it appends per-shard buffers, without an
//! extra sort step at every call site.

use sizeceph_common::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A shard identifier, `[0, N)`.
pub type ShardId = u8;

/// A sparse mapping from shard-id to owned shard buffer.
pub type ShardMap = BTreeMap<ShardId, Vec<u8>>;

/// A set of shard-ids, e.g. `want_to_encode` or `want_to_read`.
pub type ShardSet = BTreeSet<ShardId>;

/// The legacy, plain-integer-keyed shard set used by deprecated signatures.
pub type LegacyShardSet = BTreeSet<i32>;

/// The legacy, plain-integer-keyed shard map used by deprecated signatures.
pub type LegacyShardMap = BTreeMap<i32, Vec<u8>>;

/// Convert a legacy integer shard-id to a modern [`ShardId`].
///
/// # Errors
/// Returns [`Error::Invalid`] if `id` does not fit in `[0, 255]`.
pub fn shard_id_from_legacy(id: i32) -> Result<ShardId> {
    ShardId::try_from(id).map_err(|_| Error::invalid(format!("shard-id out of range: {id}")))
}

/// Convert a legacy integer-keyed shard set into a modern [`ShardSet`].
///
/// This is a pure, bijective shell: every element round-trips unchanged.
///
/// # Errors
/// Returns [`Error::Invalid`] if any element does not fit in `[0, 255]`.
pub fn shard_set_from_legacy(set: &LegacyShardSet) -> Result<ShardSet> {
    set.iter().copied().map(shard_id_from_legacy).collect()
}

/// Convert a modern [`ShardSet`] back into the legacy integer-keyed form.
#[must_use]
pub fn shard_set_to_legacy(set: &ShardSet) -> LegacyShardSet {
    set.iter().map(|&id| i32::from(id)).collect()
}

/// Convert a legacy integer-keyed shard map into a modern [`ShardMap`].
///
/// # Errors
/// Returns [`Error::Invalid`] if any key does not fit in `[0, 255]`.
pub fn shard_map_from_legacy(map: LegacyShardMap) -> Result<ShardMap> {
    map.into_iter()
        .map(|(id, buf)| shard_id_from_legacy(id).map(|id| (id, buf)))
        .collect()
}

/// Convert a modern [`ShardMap`] back into the legacy integer-keyed form.
#[must_use]
pub fn shard_map_to_legacy(map: ShardMap) -> LegacyShardMap {
    map.into_iter().map(|(id, buf)| (i32::from(id), buf)).collect()
}

/// The legacy, plain-integer-keyed per-shard cost map used by
/// `minimum_to_decode_with_cost`'s deprecated signature.
pub type LegacyCostMap = BTreeMap<i32, u64>;

/// Convert a legacy integer-keyed cost map into a modern one.
///
/// # Errors
/// Returns [`Error::Invalid`] if any key does not fit in `[0, 255]`.
pub fn cost_map_from_legacy(map: &LegacyCostMap) -> Result<BTreeMap<ShardId, u64>> {
    map.iter()
        .map(|(&id, &cost)| shard_id_from_legacy(id).map(|id| (id, cost)))
        .collect()
}
