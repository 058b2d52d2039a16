//! Monthly free-tier chat quota: a persisted usage counter with calendar-month
//! rollover, an entitlement-aware policy over it, and a small HTTP surface.

pub mod api;
pub mod clock;
pub mod config;
pub mod storage;
pub mod tracker;

use std::sync::Arc;

pub use api::{create_router, ApiState, ErrorResponse, RemainingResponse};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{QuotaTrackerConfig, StorageBackend};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};
pub use tracker::{
    Entitlements, QuotaError, QuotaPolicy, QuotaStore, Remaining, UsageRecord, UsageSnapshot,
};

/// Opens the configured storage backend and wires a policy over it.
pub fn build_policy(
    config: &QuotaTrackerConfig,
    clock: Arc<dyn Clock>,
) -> Result<QuotaPolicy, StorageError> {
    let kv: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Sqlite => Arc::new(SqliteKeyValueStore::new(&config.data_dir)?),
        StorageBackend::Memory => Arc::new(MemoryKeyValueStore::new()),
    };
    let store = QuotaStore::new(kv, clock, config.storage_key.clone());
    Ok(QuotaPolicy::new(store, config.monthly_message_limit))
}
