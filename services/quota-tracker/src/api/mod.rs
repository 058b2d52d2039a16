use std::sync::Arc;

pub mod handlers;
pub mod router;
pub mod types;

pub use router::create_router;
pub use types::*;

use crate::config::QuotaTrackerConfig;
use crate::tracker::QuotaPolicy;

pub struct ApiState {
    pub quota_policy: Arc<QuotaPolicy>,
    pub config: Arc<QuotaTrackerConfig>,
}

impl ApiState {
    pub fn new(quota_policy: Arc<QuotaPolicy>, config: QuotaTrackerConfig) -> Self {
        Self {
            quota_policy,
            config: Arc::new(config),
        }
    }
}
