//! SizeCeph Common - Shared error and result types
//!
//! This crate provides the error taxonomy used by `sizeceph-plugin`,
//! kept in its own crate so a second plugin crate could reuse it without
//! depending on the codec implementation.

pub mod error;

pub use error::{Error, Result};
