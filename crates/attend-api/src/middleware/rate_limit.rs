//! Fixed-window rate limiting per client IP
//!
//! Each limited route group gets a `route_layer` built from one of the
//! functions below. Every response from a limited route carries the
//! `X-RateLimit-*` headers; denied requests get 429 and `Retry-After`.

use attend_cache::{RateLimitDecision, RateLimitRule};
use attend_common::AppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::extractors::ClientIp;
use crate::response::ApiError;
use crate::state::AppState;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Ticket scanning at reception
pub async fn scan_limit(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, "scan", RateLimitRule::SCAN, &client, request, next).await
}

/// Attendance export for the spreadsheet sync
pub async fn export_limit(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, "export", RateLimitRule::EXPORT, &client, request, next).await
}

/// Session endpoints
pub async fn auth_limit(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, "auth", RateLimitRule::AUTH, &client, request, next).await
}

pub async fn default_limit(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    enforce(&state, "default", RateLimitRule::DEFAULT, &client, request, next).await
}

async fn enforce(
    state: &AppState,
    scope: &'static str,
    rule: RateLimitRule,
    client: &str,
    request: Request,
    next: Next,
) -> Response {
    let limiter = state.rate_limiter();
    let decision = limiter.check(&format!("{scope}:{client}"), rule).await;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!(scope, client, limit = decision.limit, "Rate limit exceeded");
        let mut response = ApiError::from(AppError::RateLimited {
            limit: decision.limit,
            reset_at: decision.reset_at,
        })
        .into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(decision.retry_after_seconds(limiter.now_ms())),
        );
        response
    };

    apply_rate_limit_headers(response.headers_mut(), &decision);
    response
}

/// Set the `X-RateLimit-*` headers for a decision
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_RESET_HEADER),
        HeaderValue::from(decision.reset_seconds()),
    );
}
