use serde::{Deserialize, Serialize};

use crate::tracker::{Remaining, UsageSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingResponse {
    pub unlimited: bool,
    pub remaining: Option<u64>,
}

impl From<Remaining> for RemainingResponse {
    fn from(remaining: Remaining) -> Self {
        Self {
            unlimited: remaining.is_unlimited(),
            remaining: remaining.as_limited(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitReachedResponse {
    pub limit_reached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementResponse {
    pub counted: bool,
    /// Usage as saved by this increment; absent for entitled callers.
    pub usage: Option<UsageSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub details: Option<serde_json::Value>,
}
