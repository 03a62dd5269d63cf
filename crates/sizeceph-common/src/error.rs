//! Error types shared by the SizeCeph erasure-code plugin
//!
//! Every variant maps 1:1 onto one of the neutral status codes the host
//! plugin interface exposes: `OK` is simply `Ok(_)`, and `INVALID` /
//! `NOT_FOUND` / `NOT_SUPPORTED` / `IO` are the variants below.

use thiserror::Error;

/// Result type used throughout the plugin
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the SizeCeph erasure-code plugin
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Preconditions on caller-supplied inputs were not met
    #[error("invalid input: {0}")]
    Invalid(String),

    /// A required resource (native library, symbol, or shard) is missing
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is defined by the interface but not implemented here,
    /// or the requested erasure pattern is not recoverable
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The native codec reported a failure
    #[error("I/O failure: {0}")]
    Io(String),
}

impl Error {
    /// Create an invalid-input error
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a not-found error
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a not-supported error
    #[must_use]
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    /// Create an I/O error
    #[must_use]
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// POSIX-shaped negative error code for the legacy, integer-keyed
    /// surface and any C-ABI caller that wants a raw `int` return value
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::Invalid(_) => -22,      // EINVAL
            Self::NotFound(_) => -2,      // ENOENT
            Self::NotSupported(_) => -95, // ENOTSUP
            Self::Io(_) => -5,            // EIO
        }
    }
}
