use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("usage storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}
