//! Native codec binding
//!
//! Encapsulates locating and binding the native SizeCeph codec behind one
//! process-wide, reference-counted singleton, matching I1–I3 in `spec.md`
//! §3: the three function pointers are published atomically (all present
//! or all absent), and a single mutex serializes load/unload/ref-counting
//! while normal operation proceeds lock-free on the already-loaded pointers.

mod dynamic;
mod reference;

use parking_lot::Mutex;
use sizeceph_common::Result;
use std::sync::{Arc, OnceLock};

/// Environment variable honored as a library-search override.
pub const LIBRARY_PATH_ENV: &str = "SIZECEPH_NATIVE_LIBRARY";

/// Environment variable that disables the pure-Rust reference fallback.
/// When set to `"1"`, a failure to locate and bind the native library is a
/// hard [`sizeceph_common::Error::NotFound`] rather than a silent fallback.
pub const STRICT_ENV: &str = "SIZECEPH_NATIVE_STRICT";

const FALLBACK_SEARCH_PATHS: &[&str] = &[
    "libsizeceph_native.so",
    "/usr/lib/ceph/erasure-code/libsizeceph_native.so",
    "/usr/lib/x86_64-linux-gnu/ceph/erasure-code/libsizeceph_native.so",
    "/usr/local/lib/ceph/erasure-code/libsizeceph_native.so",
];

/// The three native entry points, wrapped behind a safe trait.
///
/// Implementations must treat all three methods as pure functions of their
/// inputs, safe to call concurrently from multiple threads (§5).
pub trait NativeOps: Send + Sync {
    /// Split `input` (length a multiple of [`A`]) into `N` shards of
    /// `input.len() / A` bytes each.
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>>;

    /// Restore the original `out_len`-byte input from the given shards.
    /// Missing shards are `None`.
    fn restore(&self, shards: &[Option<&[u8]>], out_len: usize) -> Result<Vec<u8>>;

    /// Report whether the given set of present/missing shards is
    /// sufficient to restore the original input.
    fn can_restore(&self, shards: &[Option<&[u8]>]) -> bool;

    /// Human-readable identifier for logging (e.g. the library path, or
    /// `"reference"` for the built-in fallback).
    fn name(&self) -> &str;
}

struct BindingState {
    ops: Option<Arc<dyn NativeOps>>,
    ref_count: usize,
}

impl BindingState {
    const fn new() -> Self {
        Self {
            ops: None,
            ref_count: 0,
        }
    }
}

static BINDING: OnceLock<Mutex<BindingState>> = OnceLock::new();

fn binding() -> &'static Mutex<BindingState> {
    BINDING.get_or_init(|| Mutex::new(BindingState::new()))
}

/// A reference-counted handle to the loaded native binding.
///
/// Acquiring a handle increments the process-wide reference count;
/// dropping it decrements the count and, when it reaches zero, releases
/// the underlying library handle and clears the function pointers (I2).
pub struct NativeBindingHandle {
    ops: Arc<dyn NativeOps>,
}

impl NativeBindingHandle {
    /// Acquire a handle to the native binding, loading it if this is the
    /// first live handle.
    ///
    /// # Errors
    /// Returns [`sizeceph_common::Error::NotFound`] if no native library
    /// resolves and [`STRICT_ENV`] is set.
    pub fn acquire() -> Result<Self> {
        let mut state = binding().lock();
        if state.ops.is_none() {
            state.ops = Some(load()?);
            tracing::debug!(backend = state.ops.as_ref().unwrap().name(), "native codec binding loaded");
        }
        state.ref_count += 1;
        Ok(Self {
            ops: Arc::clone(state.ops.as_ref().unwrap()),
        })
    }

    /// The bound native operations.
    #[must_use]
    pub fn ops(&self) -> &dyn NativeOps {
        self.ops.as_ref()
    }
}

impl Drop for NativeBindingHandle {
    fn drop(&mut self) {
        let mut state = binding().lock();
        debug_assert!(state.ref_count > 0, "ref_count underflow");
        state.ref_count -= 1;
        if state.ref_count == 0 {
            tracing::debug!("native codec binding released, last instance dropped");
            state.ops = None;
        }
    }
}

/// Current reference count, for tests exercising P9 (ref-count discipline).
#[must_use]
pub fn ref_count() -> usize {
    binding().lock().ref_count
}

fn load() -> Result<Arc<dyn NativeOps>> {
    if let Ok(path) = std::env::var(LIBRARY_PATH_ENV) {
        if let Ok(dyn_ops) = dynamic::DynamicNativeOps::load(&path) {
            return Ok(Arc::new(dyn_ops));
        }
        tracing::warn!(path, "native library override did not resolve");
    }

    for candidate in FALLBACK_SEARCH_PATHS {
        if let Ok(dyn_ops) = dynamic::DynamicNativeOps::load(candidate) {
            return Ok(Arc::new(dyn_ops));
        }
    }

    if std::env::var(STRICT_ENV).as_deref() == Ok("1") {
        return Err(sizeceph_common::Error::not_found(
            "no native SizeCeph library resolved and strict mode is enabled",
        ));
    }

    tracing::warn!(
        "no native SizeCeph library resolved, falling back to the built-in reference backend"
    );
    Ok(Arc::new(reference::ReferenceNativeOps::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_counting_returns_to_zero_across_threads() {
        let before = ref_count();
        let handles: Vec<_> = std::thread::scope(|scope| {
            (0..8)
                .map(|_| scope.spawn(NativeBindingHandle::acquire))
                .collect::<Vec<_>>()
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });
        assert_eq!(ref_count(), before + 8);
        drop(handles);
        assert_eq!(ref_count(), before);
    }

    #[test]
    fn acquire_twice_reuses_the_same_backend() {
        let a = NativeBindingHandle::acquire().unwrap();
        let b = NativeBindingHandle::acquire().unwrap();
        assert_eq!(a.ops().name(), b.ops().name());
    }
}
