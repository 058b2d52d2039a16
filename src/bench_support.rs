use std::sync::Arc;

use chat_quota_tracker::{
    KeyValueStore, ManualClock, MemoryKeyValueStore, QuotaPolicy, QuotaStore, SqliteKeyValueStore,
};
use tempfile::TempDir;

// Re-export the e2e harness module
#[path = "../tests/e2e/harness.rs"]
pub mod e2e_harness;

pub use e2e_harness::{TestHarness, HARNESS_STORAGE_KEY};

/// A policy over a chosen backend, pinned to a fixed month.
pub struct QuotaBenchFixture {
    pub policy: Arc<QuotaPolicy>,
    pub clock: Arc<ManualClock>,
    // Keeps the SQLite file alive for the fixture's lifetime.
    pub temp_dir: Option<TempDir>,
}

impl QuotaBenchFixture {
    pub fn memory(limit: u64) -> Self {
        Self::build(Arc::new(MemoryKeyValueStore::new()), limit, None)
    }

    pub fn sqlite(limit: u64) -> Self {
        let temp_dir = TempDir::new().expect("tempdir");
        let kv = SqliteKeyValueStore::new(temp_dir.path()).expect("open usage database");
        Self::build(Arc::new(kv), limit, Some(temp_dir))
    }

    fn build(kv: Arc<dyn KeyValueStore>, limit: u64, temp_dir: Option<TempDir>) -> Self {
        let clock = Arc::new(ManualClock::at_month(2024, 3));
        let store = QuotaStore::new(kv, clock.clone(), HARNESS_STORAGE_KEY);
        Self {
            policy: Arc::new(QuotaPolicy::new(store, limit)),
            clock,
            temp_dir,
        }
    }
}
