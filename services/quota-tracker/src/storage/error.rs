use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
    #[error("storage connection poisoned")]
    ConnectionPoisoned,
    #[error("storage task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error("failed to encode usage record: {0}")]
    EncodeError(#[from] serde_json::Error),
    /// Raised by backends outside this crate (device stores, remote KV) that
    /// have no richer error to report.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
