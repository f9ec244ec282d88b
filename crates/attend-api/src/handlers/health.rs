//! Health check handlers
//!
//! Endpoints for liveness and readiness checks.

use attend_service::dto::{HealthResponse, ReadinessResponse};
use axum::{extract::State, http::StatusCode, Json};

use crate::state::AppState;

/// Basic health check (liveness)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
///
/// Backends that are not configured report `disabled` and do not fail the check.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.pool() {
        Some(pool) => Some(pool.acquire().await.is_ok()),
        None => None,
    };

    let redis = match state.redis_pool() {
        Some(redis_pool) => Some(redis_pool.health_check().await.is_ok()),
        None => None,
    };

    let response = ReadinessResponse::ready(database, redis);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
