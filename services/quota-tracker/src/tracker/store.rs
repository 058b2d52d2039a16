use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clock::{period_key, Clock};
use crate::storage::{KeyValueStore, StorageError};

use super::error::QuotaError;
use super::record::{RecordPayload, UsageRecord};

/// Owns the single persisted `UsageRecord` under one storage key.
///
/// Every read-modify-write runs under `write_lock`, so concurrent callers in
/// the same process never lose increments.
pub struct QuotaStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    write_lock: Mutex<()>,
}

impl QuotaStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, key: impl Into<String>) -> Self {
        Self {
            kv,
            clock,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn current_period(&self) -> String {
        period_key(&self.clock.now())
    }

    /// Reads the record, resetting it first when it is missing, corrupt, or
    /// belongs to an earlier period.
    pub async fn load(&self) -> Result<UsageRecord, QuotaError> {
        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    pub async fn save(&self, record: &UsageRecord) -> Result<(), QuotaError> {
        let _guard = self.write_lock.lock().await;
        self.save_locked(record).await
    }

    /// Loads (rolling over if needed), applies `mutate`, and saves, all under
    /// the store lock. Returns the record as saved.
    pub async fn update<F>(&self, mutate: F) -> Result<UsageRecord, QuotaError>
    where
        F: FnOnce(&mut UsageRecord),
    {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load_locked().await?;
        mutate(&mut record);
        self.save_locked(&record).await?;
        Ok(record)
    }

    /// Unconditionally overwrites the record with a fresh one for the current
    /// period.
    pub async fn reset(&self) -> Result<UsageRecord, QuotaError> {
        let _guard = self.write_lock.lock().await;
        let fresh = UsageRecord::fresh(self.current_period());
        self.save_locked(&fresh).await?;
        info!(key = %self.key, period = %fresh.period, "usage record reset");
        Ok(fresh)
    }

    async fn load_locked(&self) -> Result<UsageRecord, QuotaError> {
        let current = self.current_period();
        let stored = self.kv.get(&self.key).await?;

        let record = match stored.as_deref().map(UsageRecord::decode) {
            Some(RecordPayload::Valid(record)) if record.period == current => return Ok(record),
            Some(RecordPayload::Valid(stale)) => {
                info!(
                    key = %self.key,
                    stale_period = %stale.period,
                    stale_count = stale.count,
                    period = %current,
                    "usage period rolled over"
                );
                UsageRecord::fresh(current)
            }
            Some(RecordPayload::Corrupt(reason)) => {
                warn!(key = %self.key, reason = %reason, "discarding corrupt usage record");
                UsageRecord::fresh(current)
            }
            None => {
                debug!(key = %self.key, period = %current, "initializing usage record");
                UsageRecord::fresh(current)
            }
        };

        self.save_locked(&record).await?;
        Ok(record)
    }

    async fn save_locked(&self, record: &UsageRecord) -> Result<(), QuotaError> {
        let encoded = record.encode().map_err(StorageError::from)?;
        self.kv.set(&self.key, &encoded).await?;
        Ok(())
    }
}
