//! Built-in reference backend
//!
//! Stands in for the external native library when nothing on the search
//! path resolves (see `mod.rs`). It satisfies the same observable contract
//! the real native codec is specified to have — §4.1 of `spec.md`: `N`
//! fixed-size output shards, none a verbatim copy of the input, invertible
//! from the full `N`-shard set — but its internal transform carries no
//! compatibility guarantee across versions and is not part of the plugin's
//! external interface.
//!
//! The transform treats the input as a sequence of 4-byte blocks
//! `(b0, b1, b2, b3)` and produces nine output bytes per block, each an
//! XOR of two or three of the four input bytes. The nine combinations are
//! chosen so that the first five alone (`s0..s4`) already determine
//! `b0..b3`; the remaining four exist only because the real codec always
//! emits all nine, not because this backend needs them.

use super::NativeOps;
use crate::sizeceph::constants::{A, N};
use sizeceph_common::{Error, Result};

pub struct ReferenceNativeOps;

impl ReferenceNativeOps {
    pub const fn new() -> Self {
        Self
    }

    /// Encode one 4-byte block into nine output bytes.
    fn encode_block(b: [u8; 4]) -> [u8; 9] {
        let [b0, b1, b2, b3] = b;
        [
            b0 ^ b1,
            b0 ^ b2,
            b1 ^ b2,
            b0 ^ b1 ^ b2,
            b0 ^ b3,
            b1 ^ b3,
            b0 ^ b1 ^ b3,
            b2 ^ b3,
            b0 ^ b2 ^ b3,
        ]
    }

    /// Recover one 4-byte block from all nine shard bytes.
    fn decode_block(s: [u8; 9]) -> [u8; 4] {
        let b0 = s[2] ^ s[3];
        let b1 = s[0] ^ s[2] ^ s[3];
        let b2 = s[1] ^ s[2] ^ s[3];
        let b3 = s[2] ^ s[3] ^ s[4];
        [b0, b1, b2, b3]
    }
}

impl NativeOps for ReferenceNativeOps {
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>> {
        if input.len() as u64 % A != 0 {
            return Err(Error::invalid("input length is not a multiple of A"));
        }
        let blocks = input.len() / A as usize;
        let mut shards: Vec<Vec<u8>> = (0..N).map(|_| Vec::with_capacity(blocks)).collect();
        for chunk in input.chunks_exact(A as usize) {
            let block = [chunk[0], chunk[1], chunk[2], chunk[3]];
            for (shard, byte) in shards.iter_mut().zip(Self::encode_block(block)) {
                shard.push(byte);
            }
        }
        Ok(shards)
    }

    fn restore(&self, shards: &[Option<&[u8]>], out_len: usize) -> Result<Vec<u8>> {
        if !self.can_restore(shards) {
            return Err(Error::io("reference backend: insufficient shards to restore"));
        }
        let blocks = out_len / A as usize;
        let mut out = Vec::with_capacity(out_len);
        for block_idx in 0..blocks {
            let mut s = [0u8; 9];
            for (i, slot) in s.iter_mut().enumerate() {
                *slot = shards[i].expect("can_restore verified presence")[block_idx];
            }
            out.extend_from_slice(&Self::decode_block(s));
        }
        Ok(out)
    }

    fn can_restore(&self, shards: &[Option<&[u8]>]) -> bool {
        shards.len() == N as usize && shards.iter().all(Option::is_some)
    }

    fn name(&self) -> &str {
        "reference"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_round_trips() {
        let block = [0x01, 0x02, 0x03, 0x04];
        let encoded = ReferenceNativeOps::encode_block(block);
        assert_eq!(ReferenceNativeOps::decode_block(encoded), block);
    }

    #[test]
    fn split_then_restore_reproduces_input() {
        let ops = ReferenceNativeOps::new();
        let input: Vec<u8> = (0u8..=255).cycle().take(256).collect();
        let shards = ops.split(&input).unwrap();
        assert_eq!(shards.len(), N as usize);
        assert!(shards.iter().all(|s| s.len() == input.len() / A as usize));

        let refs: Vec<Option<&[u8]>> = shards.iter().map(|s| Some(s.as_slice())).collect();
        assert!(ops.can_restore(&refs));
        let restored = ops.restore(&refs, input.len()).unwrap();
        assert_eq!(restored, input);
    }

    #[test]
    fn missing_shard_is_not_restorable() {
        let ops = ReferenceNativeOps::new();
        let input = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let shards = ops.split(&input).unwrap();
        let mut refs: Vec<Option<&[u8]>> = shards.iter().map(|s| Some(s.as_slice())).collect();
        refs[4] = None;
        assert!(!ops.can_restore(&refs));
    }

    #[test]
    fn no_output_shard_equals_an_input_byte_column() {
        let ops = ReferenceNativeOps::new();
        let input = vec![0x01, 0x02, 0x03, 0x04];
        let shards = ops.split(&input).unwrap();
        for shard in &shards {
            assert_ne!(shard[0], input[0]);
        }
    }
}
