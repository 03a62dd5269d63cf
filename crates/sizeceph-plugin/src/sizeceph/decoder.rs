//! SizeCeph decoder — §4.3

use crate::binding::NativeBindingHandle;
use crate::shard::{ShardId, ShardMap, ShardSet};
use sizeceph_common::{Error, Result};

use super::constants::{A, K, N};

/// Decode `want_to_read` from the given `chunks`, under the strictest
/// always-decode policy: every one of the `N` shards must be present.
///
/// `chunk_size`, if `Some`, overrides inference from `chunks`; `None`
/// infers it from the first entry (by ascending shard-id).
///
/// # Errors
/// - [`Error::NotFound`] if the native binding is unavailable, or fewer
///   than `N` shards are present.
/// - [`Error::Invalid`] if `want_to_read` names a shard-id outside
///   `[0, N)`, or the inferred chunk size is zero.
/// - [`Error::NotSupported`] if the native validator rejects the present
///   shard set.
/// - [`Error::Io`] if the native restore call fails.
pub fn decode(
    want_to_read: &ShardSet,
    chunks: &ShardMap,
    chunk_size: Option<usize>,
) -> Result<ShardMap> {
    if let Some(&id) = want_to_read.iter().find(|&&id| id >= N) {
        return Err(Error::invalid(format!("shard-id {id} is out of range for SizeCeph")));
    }

    let handle = NativeBindingHandle::acquire()?;

    if chunks.len() != N as usize || !(0..N).all(|id| chunks.contains_key(&id)) {
        return Err(Error::not_found(
            "all N shards must be present to decode under the always-decode policy",
        ));
    }

    let chunk_size = match chunk_size {
        Some(c) if c > 0 => c,
        Some(_) => return Err(Error::invalid("chunk_size must be positive")),
        None => chunks
            .values()
            .next()
            .map(Vec::len)
            .filter(|&c| c > 0)
            .ok_or_else(|| Error::invalid("cannot infer chunk_size from empty chunks"))?,
    };

    let refs: Vec<Option<&[u8]>> = (0..N)
        .map(|id| chunks.get(&id).map(Vec::as_slice))
        .collect();

    if !handle.ops().can_restore(&refs) {
        return Err(Error::not_supported(
            "native codec cannot restore from the presented shard set",
        ));
    }

    let original_len = chunk_size * A as usize;
    let restored = handle
        .ops()
        .restore(&refs, original_len)
        .map_err(|e| Error::io(format!("native restore failed: {e}")))?;

    let data_shard_len = original_len / K as usize;
    let mut out = ShardMap::new();
    for &id in want_to_read {
        if id < K {
            let start = id as usize * data_shard_len;
            let end = if id == K - 1 {
                original_len
            } else {
                start + data_shard_len
            };
            out.insert(id, restored[start..end].to_vec());
        } else {
            // id in [K, N): already validated above, parity shards carry
            // no readable data.
            out.insert(id, Vec::new());
        }
    }
    Ok(out)
}

/// `decode` followed by concatenation of the requested shards, in the
/// order given by iterating `want_to_read` (ascending, since it is a
/// [`ShardSet`]/`BTreeSet`). A requested shard absent from the decoded
/// output is represented as `chunk_size` zero bytes.
///
/// # Errors
/// See [`decode`].
pub fn decode_concat(
    want_to_read: &ShardSet,
    chunks: &ShardMap,
    chunk_size: Option<usize>,
) -> Result<Vec<u8>> {
    let decoded = decode(want_to_read, chunks, chunk_size)?;
    let inferred_chunk_size = chunk_size.unwrap_or_else(|| {
        chunks
            .values()
            .next()
            .map_or(0, Vec::len)
    });

    let mut out = Vec::new();
    for &id in want_to_read {
        match decoded.get(&id) {
            Some(buf) => out.extend_from_slice(buf),
            None => out.extend(std::iter::repeat_n(0u8, inferred_chunk_size)),
        }
    }
    Ok(out)
}

/// `minimum_to_decode(want_to_read, available) → minimum_set`.
///
/// SizeCeph's minimum equals `available` exactly when `available`
/// contains every id in `[0, N)`; otherwise this fails — the policy is
/// set-determined, never partially satisfiable.
///
/// # Errors
/// Returns [`Error::Io`] if `available` does not contain every shard-id
/// in `[0, N)`.
pub fn minimum_to_decode(_want_to_read: &ShardSet, available: &ShardSet) -> Result<ShardSet> {
    if (0..N).all(|id| available.contains(&id)) {
        Ok(available.clone())
    } else {
        Err(Error::io(
            "no subset of the available shards is sufficient to decode",
        ))
    }
}

/// `minimum_to_decode_with_cost`: identical to [`minimum_to_decode`]; the
/// SizeCeph policy is set-determined, so per-shard read costs are ignored.
///
/// # Errors
/// See [`minimum_to_decode`].
pub fn minimum_to_decode_with_cost(
    want_to_read: &ShardSet,
    available: &ShardSet,
    _cost: &std::collections::BTreeMap<ShardId, u64>,
) -> Result<ShardSet> {
    minimum_to_decode(want_to_read, available)
}
