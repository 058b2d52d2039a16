use serde::{Deserialize, Serialize};

/// Persisted free-tier usage for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub count: u64,
    pub period: String,
}

impl UsageRecord {
    pub fn fresh(period: impl Into<String>) -> Self {
        Self {
            count: 0,
            period: period.into(),
        }
    }

    pub fn remaining(&self, limit: u64) -> u64 {
        limit.saturating_sub(self.count)
    }

    pub fn is_limit_reached(&self, limit: u64) -> bool {
        self.count >= limit
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> RecordPayload {
        match serde_json::from_str::<UsageRecord>(raw) {
            Ok(record) => RecordPayload::Valid(record),
            Err(err) => RecordPayload::Corrupt(err.to_string()),
        }
    }
}

/// Outcome of parsing a stored payload. A corrupt payload is recovered from by
/// resetting, never surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPayload {
    Valid(UsageRecord),
    Corrupt(String),
}
