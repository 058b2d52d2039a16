use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::QuotaError;
use super::record::UsageRecord;
use super::store::QuotaStore;

/// Paid-tier flags supplied by the subscription provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entitlements {
    pub is_pro: bool,
    pub is_deluxe: bool,
}

impl Entitlements {
    pub fn new(is_pro: bool, is_deluxe: bool) -> Self {
        Self { is_pro, is_deluxe }
    }

    pub fn free() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.is_pro || self.is_deluxe
    }
}

/// Messages left in the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Limited(u64),
}

impl Remaining {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Remaining::Unlimited)
    }

    pub fn as_limited(&self) -> Option<u64> {
        match self {
            Remaining::Unlimited => None,
            Remaining::Limited(n) => Some(*n),
        }
    }
}

/// Free-tier view of the current usage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub count: u64,
    pub period: String,
    pub limit: u64,
    pub remaining: u64,
    pub limit_reached: bool,
}

/// Monthly message quota for free-tier users. Entitled users bypass it
/// without touching storage.
///
/// Enforcement belongs to the caller: `increment` never refuses, and the count
/// may run past the limit.
pub struct QuotaPolicy {
    store: QuotaStore,
    limit: u64,
}

impl QuotaPolicy {
    pub fn new(store: QuotaStore, limit: u64) -> Self {
        Self { store, limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub async fn remaining(&self, entitlements: Entitlements) -> Result<Remaining, QuotaError> {
        if entitlements.is_unlimited() {
            return Ok(Remaining::Unlimited);
        }
        let record = self.store.load().await?;
        Ok(Remaining::Limited(record.remaining(self.limit)))
    }

    /// Counts one message for free-tier callers and returns the record as
    /// saved. Entitled callers get `None` and storage is not touched.
    #[instrument(skip(self), fields(key = %self.store.key()))]
    pub async fn increment(
        &self,
        entitlements: Entitlements,
    ) -> Result<Option<UsageRecord>, QuotaError> {
        if entitlements.is_unlimited() {
            return Ok(None);
        }
        let record = self
            .store
            .update(|record| record.count = record.count.saturating_add(1))
            .await?;
        debug!(
            count = record.count,
            period = %record.period,
            limit = self.limit,
            "chat message counted"
        );
        Ok(Some(record))
    }

    pub async fn has_reached_limit(&self, entitlements: Entitlements) -> Result<bool, QuotaError> {
        if entitlements.is_unlimited() {
            return Ok(false);
        }
        let record = self.store.load().await?;
        Ok(record.is_limit_reached(self.limit))
    }

    pub async fn status(&self) -> Result<UsageSnapshot, QuotaError> {
        let record = self.store.load().await?;
        Ok(self.snapshot(&record))
    }

    pub async fn reset(&self) -> Result<UsageSnapshot, QuotaError> {
        let record = self.store.reset().await?;
        Ok(self.snapshot(&record))
    }

    pub fn snapshot(&self, record: &UsageRecord) -> UsageSnapshot {
        UsageSnapshot {
            count: record.count,
            period: record.period.clone(),
            limit: self.limit,
            remaining: record.remaining(self.limit),
            limit_reached: record.is_limit_reached(self.limit),
        }
    }
}
