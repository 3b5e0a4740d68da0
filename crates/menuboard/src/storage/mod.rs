//! Storage layer for menuboard.
//!
//! The application persists through a small asynchronous string key-value
//! contract, [`KeyValueStore`]. [`SqliteStore`] keeps values in a `SQLite`
//! database; [`MemoryStore`] keeps them in process memory.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreStats};

/// An asynchronous string-keyed store.
///
/// `set` replaces any previous value; the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
