//! Core types and trait definitions for the Weavery registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entry;
pub mod error;
pub mod event;
pub mod store;
pub mod weave;

pub use error::{Error, ErrorKind, Result};
