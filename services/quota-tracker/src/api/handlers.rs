use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::tracker::{Entitlements, QuotaError, UsageSnapshot};

use super::types::{ErrorResponse, IncrementResponse, LimitReachedResponse, RemainingResponse};
use super::ApiState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub async fn get_usage(State(state): State<Arc<ApiState>>) -> ApiResult<UsageSnapshot> {
    let snapshot = state.quota_policy.status().await.map_err(quota_error)?;
    Ok(Json(snapshot))
}

pub async fn get_remaining(
    State(state): State<Arc<ApiState>>,
    Query(entitlements): Query<Entitlements>,
) -> ApiResult<RemainingResponse> {
    let remaining = state
        .quota_policy
        .remaining(entitlements)
        .await
        .map_err(quota_error)?;
    Ok(Json(remaining.into()))
}

pub async fn get_limit_reached(
    State(state): State<Arc<ApiState>>,
    Query(entitlements): Query<Entitlements>,
) -> ApiResult<LimitReachedResponse> {
    let limit_reached = state
        .quota_policy
        .has_reached_limit(entitlements)
        .await
        .map_err(quota_error)?;
    Ok(Json(LimitReachedResponse { limit_reached }))
}

/// A missing or non-JSON body counts as the free tier.
pub async fn increment_usage(
    State(state): State<Arc<ApiState>>,
    body: Option<Json<Entitlements>>,
) -> ApiResult<IncrementResponse> {
    let entitlements = body.map(|Json(flags)| flags).unwrap_or_default();
    let saved = state
        .quota_policy
        .increment(entitlements)
        .await
        .map_err(quota_error)?;

    Ok(Json(IncrementResponse {
        counted: saved.is_some(),
        usage: saved.map(|record| state.quota_policy.snapshot(&record)),
    }))
}

pub async fn reset_usage(State(state): State<Arc<ApiState>>) -> ApiResult<UsageSnapshot> {
    let snapshot = state.quota_policy.reset().await.map_err(quota_error)?;

    info!(
        key = %state.config.storage_key,
        period = %snapshot.period,
        "chat usage reset via API"
    );

    Ok(Json(snapshot))
}

pub async fn health_check(State(state): State<Arc<ApiState>>) -> ApiResult<serde_json::Value> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "chat-quota-tracker",
        "monthly_message_limit": state.quota_policy.limit(),
    })))
}

fn quota_error(err: QuotaError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        QuotaError::StorageUnavailable(source) => {
            error!(error = %source, "chat usage storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "usage storage unavailable".to_string(),
                    code: "storage_unavailable".to_string(),
                    details: Some(serde_json::json!({ "message": source.to_string() })),
                }),
            )
        }
    }
}
