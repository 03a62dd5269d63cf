//! SizeCeph erasure-code plugin
//!
//! This crate provides two erasure-code "techniques" behind one plugin
//! façade, for a host that loads codecs by name and profile:
//!
//! - **sizeceph** (default, k=4 m=5): an always-decode data-transformation
//!   code. The actual transform lives in an external native library,
//!   dynamically bound at first use; see [`binding`].
//! - **simple_xor** (k=2 m=1): a conventional single-parity XOR code,
//!   implemented entirely in Rust.
//!
//! # Example
//!
//! ```
//! use sizeceph_plugin::prelude::*;
//! use sizeceph_plugin::profile::Profile;
//!
//! let codec = factory("/unused", &Profile::new()).unwrap();
//! let full: ShardSet = (0..codec.get_chunk_count()).collect();
//! let shards = codec.encode(&full, &[]).unwrap();
//! assert_eq!(shards.len(), 9);
//! ```

pub mod align;
pub mod binding;
pub mod facade;
pub mod factory;
pub mod optimizations;
pub mod profile;
pub mod rule;
pub mod shard;
pub mod sizeceph;
pub mod xor;

pub use facade::{ErasureCodeInterface, LegacyErasureCodeInterface, PluginCodec};
pub use factory::{factory, plugin_init, plugin_version};
pub use sizeceph::SizeCephCodec;
pub use xor::XorCodec;

/// Prelude for common imports
pub mod prelude {
    pub use super::facade::{ErasureCodeInterface, LegacyErasureCodeInterface, PluginCodec};
    pub use super::factory::{factory, plugin_init, plugin_version};
    pub use super::shard::{ShardId, ShardMap, ShardSet};
    pub use super::sizeceph::SizeCephCodec;
    pub use super::xor::XorCodec;
}
