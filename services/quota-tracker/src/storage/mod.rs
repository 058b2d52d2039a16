//! Key-value persistence port for the usage record and its backends.

pub mod database;
pub mod error;
pub mod memory;
pub mod schema;

use async_trait::async_trait;

pub use database::SqliteKeyValueStore;
pub use error::StorageError;
pub use memory::MemoryKeyValueStore;

pub const USAGE_DB_FILENAME: &str = "usage.db";

/// Durable string key-value storage.
///
/// Both operations may suspend and may fail; callers treat any error as the
/// backend being unavailable.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites the value stored under `key` in a single write.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
