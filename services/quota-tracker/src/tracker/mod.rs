pub mod error;
pub mod policy;
pub mod record;
pub mod store;

pub use error::QuotaError;
pub use policy::{Entitlements, QuotaPolicy, Remaining, UsageSnapshot};
pub use record::{RecordPayload, UsageRecord};
pub use store::QuotaStore;

pub const DEFAULT_STORAGE_KEY: &str = "chat_usage";
pub const DEFAULT_MONTHLY_MESSAGE_LIMIT: u64 = 5;
