use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::ApiState;

pub fn create_router(state: Arc<ApiState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    Router::new()
        .route("/api/quota", get(handlers::get_usage))
        .route("/api/quota/remaining", get(handlers::get_remaining))
        .route("/api/quota/limit-reached", get(handlers::get_limit_reached))
        .route("/api/quota/increment", post(handlers::increment_usage))
        .route("/api/quota/reset", post(handlers::reset_usage))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(middleware)
}
