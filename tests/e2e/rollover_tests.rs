use std::sync::Arc;

use anyhow::Result;
use chat_quota_tracker::ManualClock;

use super::TestHarness;

#[tokio::test(flavor = "multi_thread")]
async fn test_new_month_resets_exhausted_quota() -> Result<()> {
    let clock = Arc::new(ManualClock::at_month(2024, 1));
    let harness = TestHarness::start_memory(5, clock.clone()).await?;

    for _ in 0..5 {
        harness.increment(false, false).await?;
    }
    assert!(harness.limit_reached(false, false).await?);

    clock.set_month(2024, 2);
    let (status, usage) = harness.get_json("/api/quota").await?;
    assert_eq!(status, 200);
    assert_eq!(usage["period"], "2024-02");
    assert_eq!(usage["count"], 0);
    assert!(!harness.limit_reached(false, false).await?);

    harness.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_year_boundary_rollover() -> Result<()> {
    let clock = Arc::new(ManualClock::at_month(2024, 12));
    let harness = TestHarness::start_memory(5, clock.clone()).await?;
    harness.increment(false, false).await?;

    clock.set_month(2025, 1);
    let body = harness.increment(false, false).await?;
    assert_eq!(body["usage"]["period"], "2025-01");
    assert_eq!(body["usage"]["count"], 1);

    harness.shutdown().await
}
