//! SizeCeph encoder — §4.2

use crate::binding::NativeBindingHandle;
use crate::shard::{ShardId, ShardMap, ShardSet};
use sizeceph_common::{Error, Result};
use std::collections::BTreeMap;

use super::constants::{A, N};

/// Encode `input` into `N` shards.
///
/// `want_to_encode` must equal `[0, N)` exactly — SizeCeph's transform
/// produces correlated shards, so emitting a subset is meaningless.
///
/// # Errors
/// - [`Error::NotFound`] if the native binding cannot be loaded.
/// - [`Error::Invalid`] if `want_to_encode != [0, N)` or `input.len()` is
///   not a multiple of `A`.
/// - [`Error::Io`] if the native codec reports a failure.
pub fn encode(want_to_encode: &ShardSet, input: &[u8]) -> Result<ShardMap> {
    let full: ShardSet = (0..N).collect();
    if *want_to_encode != full {
        return Err(Error::invalid(
            "want_to_encode must equal [0, N) exactly for SizeCeph",
        ));
    }
    if input.len() as u64 % A != 0 {
        return Err(Error::invalid("input length must be a multiple of A"));
    }

    if input.is_empty() {
        tracing::debug!("encoding empty input, native codec not invoked");
        return Ok((0..N).map(|id| (id, Vec::new())).collect());
    }

    let handle = NativeBindingHandle::acquire()?;
    let shards = handle
        .ops()
        .split(input)
        .map_err(|e| Error::io(format!("native split failed: {e}")))?;

    let map: ShardMap = (0..N)
        .zip(shards)
        .collect::<BTreeMap<ShardId, Vec<u8>>>();
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> ShardSet {
        (0..N).collect()
    }

    #[test]
    fn empty_input_produces_n_empty_buffers_without_native_call() {
        let out = encode(&full_set(), &[]).unwrap();
        assert_eq!(out.len(), N as usize);
        assert!(out.values().all(Vec::is_empty));
    }

    #[test]
    fn rejects_partial_want_to_encode() {
        let partial: ShardSet = (0..N - 1).collect();
        assert!(encode(&partial, &[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn rejects_misaligned_input() {
        assert!(encode(&full_set(), &[1, 2, 3]).is_err());
    }

    #[test]
    fn produces_n_uniform_shards() {
        let input = vec![0xAB; 512];
        let out = encode(&full_set(), &input).unwrap();
        assert_eq!(out.len(), N as usize);
        let shard_len = 512 / A as usize;
        assert!(out.values().all(|v| v.len() == shard_len));
    }
}
