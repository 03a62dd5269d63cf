//! `dlopen`-backed native codec binding
//!
//! Resolves the three entry points named in `spec.md` §6
//! (`size_split`, `size_restore`, `size_can_get_restore_fn`) from a shared
//! library and wraps them as a safe [`NativeOps`] implementation. All three
//! symbols must resolve or the library is not considered loaded (I1).

use super::NativeOps;
use crate::sizeceph::constants::{A, N};
use libloading::{Library, Symbol};
use sizeceph_common::{Error, Result};

type SplitFn = unsafe extern "C" fn(out: *const *mut u8, input: *const u8, len: u32);
type RestoreFn = unsafe extern "C" fn(out: *mut u8, shards: *const *const u8, len: u32) -> i32;
type CanRestoreFn = unsafe extern "C" fn(shards: *const *const u8) -> i32;

pub struct DynamicNativeOps {
    // Kept alive for as long as the raw function pointers below are used;
    // never called again after construction, but dropping it would
    // invalidate `split`/`restore`/`can_restore`.
    _library: Library,
    path: String,
    split: SplitFn,
    restore: RestoreFn,
    can_restore: CanRestoreFn,
}

impl DynamicNativeOps {
    pub fn load(path: &str) -> Result<Self> {
        // Safety: loading an arbitrary shared library is inherently unsafe;
        // the caller controls `path` via the documented search order and is
        // trusted to point at a real SizeCeph codec library.
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::not_found(format!("failed to load `{path}`: {e}")))?;

        // Safety: each symbol lookup is transmuting to the conceptual
        // signature documented in spec.md §6; a library that exports a
        // symbol under this name with a different signature is a
        // deployment error outside what this binding can detect.
        let split: SplitFn = unsafe {
            let sym: Symbol<SplitFn> = library
                .get(b"size_split\0")
                .map_err(|e| Error::not_found(format!("`{path}` missing size_split: {e}")))?;
            *sym
        };
        let restore: RestoreFn = unsafe {
            let sym: Symbol<RestoreFn> = library
                .get(b"size_restore\0")
                .map_err(|e| Error::not_found(format!("`{path}` missing size_restore: {e}")))?;
            *sym
        };
        let can_restore: CanRestoreFn = unsafe {
            let sym: Symbol<CanRestoreFn> = library
                .get(b"size_can_get_restore_fn\0")
                .map_err(|e| {
                    Error::not_found(format!("`{path}` missing size_can_get_restore_fn: {e}"))
                })?;
            *sym
        };

        Ok(Self {
            _library: library,
            path: path.to_string(),
            split,
            restore,
            can_restore,
        })
    }
}

impl NativeOps for DynamicNativeOps {
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>> {
        if input.len() as u64 % A != 0 {
            return Err(Error::invalid("input length is not a multiple of A"));
        }
        let shard_len = input.len() / A as usize;
        let mut buffers: Vec<Vec<u8>> = (0..N).map(|_| vec![0u8; shard_len]).collect();
        let mut out_ptrs: Vec<*mut u8> = buffers.iter_mut().map(Vec::as_mut_ptr).collect();

        // Safety: `out_ptrs` has exactly N entries each backed by a
        // `shard_len`-byte allocation; `input` is `input.len()` valid
        // bytes; the native contract writes at most `len / A` bytes to
        // each output buffer.
        unsafe {
            (self.split)(out_ptrs.as_mut_ptr().cast_const(), input.as_ptr(), input.len() as u32);
        }
        Ok(buffers)
    }

    fn restore(&self, shards: &[Option<&[u8]>], out_len: usize) -> Result<Vec<u8>> {
        let in_ptrs: Vec<*const u8> = shards
            .iter()
            .map(|s| s.map_or(std::ptr::null(), <[u8]>::as_ptr))
            .collect();
        let mut out = vec![0u8; out_len];

        // Safety: `out` is `out_len` writable bytes; `in_ptrs` holds N
        // entries, each either null or pointing at a valid shard buffer
        // that the native contract promises not to write through.
        let rc = unsafe {
            (self.restore)(out.as_mut_ptr(), in_ptrs.as_ptr(), out_len as u32)
        };
        if rc == 0 {
            Ok(out)
        } else {
            Err(Error::io(format!("size_restore returned {rc}")))
        }
    }

    fn can_restore(&self, shards: &[Option<&[u8]>]) -> bool {
        let in_ptrs: Vec<*const u8> = shards
            .iter()
            .map(|s| s.map_or(std::ptr::null(), <[u8]>::as_ptr))
            .collect();
        // Safety: see `restore`; `size_can_get_restore_fn` only reads the
        // pointer values, never dereferences a null one.
        let rc = unsafe { (self.can_restore)(in_ptrs.as_ptr()) };
        rc != 0
    }

    fn name(&self) -> &str {
        &self.path
    }
}

// Safety: the native ABI is documented (spec.md §6) as thread-safe pure
// functions of their arguments; no shared mutable state crosses the FFI
// boundary after construction.
unsafe impl Send for DynamicNativeOps {}
unsafe impl Sync for DynamicNativeOps {}
