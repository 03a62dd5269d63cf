//! The simple-XOR (k=2, m=1) erasure code — §4.7
//!
//! Unlike SizeCeph, this is a genuine Reed-Solomon-style parity code: shard
//! 2 is the bytewise XOR of shards 0 and 1, and any single erasure is
//! reconstructed directly from the other two. It shares SizeCeph's façade
//! (the host sees the same `encode`/`decode`/`decode_concat` surface) but
//! needs no native binding at all.

use crate::align::get_chunk_size;
use crate::facade::ErasureCodeInterface;
use crate::profile::{validate_xor_profile, Profile};
use crate::shard::{ShardMap, ShardSet};
use sizeceph_common::{Error, Result};

const K: u8 = 2;
const M: u8 = 1;
const N: u8 = K + M;
/// `sizeof(int)` on the platforms this plugin targets.
const ALIGNMENT: u64 = std::mem::size_of::<i32>() as u64;

pub struct XorCodec;

impl XorCodec {
    /// Validate `profile` and construct a codec instance.
    ///
    /// # Errors
    /// Returns [`Error::Invalid`] if `profile` names a `technique`, `k`, or
    /// `m` other than `simple_xor`/2/1.
    pub fn new(profile: &Profile) -> Result<Self> {
        validate_xor_profile(profile, K, M)?;
        Ok(Self)
    }

    fn xor_bytewise(a: &[u8], b: &[u8]) -> Vec<u8> {
        a.iter().zip(b).map(|(x, y)| x ^ y).collect()
    }
}

impl ErasureCodeInterface for XorCodec {
    fn init(&self, profile: &Profile) -> Result<()> {
        validate_xor_profile(profile, K, M)
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
        ALIGNMENT
    }

    fn get_chunk_size(&self, stripe_width: u64) -> u64 {
        get_chunk_size(stripe_width, u64::from(K), ALIGNMENT)
    }

    fn encode(&self, want_to_encode: &ShardSet, input: &[u8]) -> Result<ShardMap> {
        if input.len() as u64 % (u64::from(K) * ALIGNMENT) != 0 {
            return Err(Error::invalid("input length must be a multiple of K * alignment"));
        }
        let chunk_size = input.len() / K as usize;
        let d0 = &input[..chunk_size];
        let d1 = &input[chunk_size..];
        let parity = Self::xor_bytewise(d0, d1);

        let mut out = ShardMap::new();
        for &id in want_to_encode {
            match id {
                0 => out.insert(id, d0.to_vec()),
                1 => out.insert(id, d1.to_vec()),
                2 => out.insert(id, parity.clone()),
                _ => return Err(Error::invalid(format!("shard-id {id} is out of range for simple_xor"))),
            };
        }
        Ok(out)
    }

    /// Reconstructs a single missing shard from the other two (the XOR
    /// parity laws in P7). Only invoked when an erasure actually exists,
    /// matching the host's conditional-decode model for jerasure-style
    /// codes (§4.7).
    fn decode(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<ShardMap> {
        let missing: Vec<u8> = (0..N).filter(|id| !chunks.contains_key(id)).collect();
        if missing.len() > 1 {
            return Err(Error::not_supported(
                "simple_xor cannot recover more than one erasure",
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

        let reconstructed = match missing.first() {
            None => None,
            Some(&0) => Some((0, Self::xor_bytewise(&chunks[&1], &chunks[&2]))),
            Some(&1) => Some((1, Self::xor_bytewise(&chunks[&0], &chunks[&2]))),
            Some(&2) => Some((2, Self::xor_bytewise(&chunks[&0], &chunks[&1]))),
            Some(_) => unreachable!("N == 3, missing ids are always in [0, 3)"),
        };

        let mut out = ShardMap::new();
        for &id in want_to_read {
            if id >= N {
                return Err(Error::invalid(format!("shard-id {id} is out of range for simple_xor")));
            }
            let buf = match &reconstructed {
                Some((rid, data)) if *rid == id => data.clone(),
                _ => chunks
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| vec![0u8; chunk_size]),
            };
            out.insert(id, buf);
        }
        Ok(out)
    }

    fn decode_concat(
        &self,
        want_to_read: &ShardSet,
        chunks: &ShardMap,
        chunk_size: Option<usize>,
    ) -> Result<Vec<u8>> {
        let decoded = self.decode(want_to_read, chunks, chunk_size)?;
        let mut out = Vec::new();
        for &id in want_to_read {
            if let Some(buf) = decoded.get(&id) {
                out.extend_from_slice(buf);
            }
        }
        Ok(out)
    }

    fn minimum_to_decode(&self, want_to_read: &ShardSet, available: &ShardSet) -> Result<ShardSet> {
        let missing_data: Vec<u8> = want_to_read
            .iter()
            .filter(|id| !available.contains(id))
            .copied()
            .collect();
        if missing_data.is_empty() {
            return Ok(want_to_read.intersection(available).copied().collect());
        }
        if missing_data.len() > 1 || available.len() < (N - 1) as usize {
            return Err(Error::io("no available subset is sufficient to decode"));
        }
        Ok(available.clone())
    }

    /// Identity-matrix application: applying the identity matrix to a
    /// delta reproduces it unchanged, so this leaves `out` untouched
    /// rather than clearing it (unlike the SizeCeph default).
    fn apply_delta(&self, _delta: &[u8], _out: &mut ShardMap) {}
}
