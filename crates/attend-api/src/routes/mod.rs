//! Route definitions
//!
//! All API routes organized by domain and mounted under /api. Each group
//! carries its own rate-limit preset.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, checkin, export, health, scan, tickets};
use crate::middleware::rate_limit;
use crate::state::AppState;

/// Create the main API router with all routes (excluding health, which is not rate limited)
pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api", api_routes(&state))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(scan_routes(state))
        .merge(checkin_routes(state))
        .merge(export_routes(state))
        .merge(session_routes(state))
}

/// Reception scanner
fn scan_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan::scan))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::scan_limit))
}

/// Staff check-in
fn checkin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/checkin/manual", post(checkin::manual_check_in))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::default_limit))
}

/// Spreadsheet export
fn export_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/attendance-export", get(export::attendance_export))
        .route("/attendance-export/range", get(export::attendance_export_range))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::export_limit))
}

/// Session-authenticated participant routes
fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/tickets/@me", get(tickets::my_ticket))
        .route("/auth/session", post(auth::create_session))
        .route("/auth/logout", post(auth::logout))
        .route_layer(from_fn_with_state(state.clone(), rate_limit::auth_limit))
}
