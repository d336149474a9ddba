//! SQLite backend for the Weavery registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single thread also
//! provides the global serialization of mutating calls the registry
//! contract requires; each mutation additionally runs inside one SQLite
//! transaction so state change and event commit together or not at all.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
