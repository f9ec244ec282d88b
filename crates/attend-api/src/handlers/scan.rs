//! Ticket scan handler
//!
//! Every outcome, failures included, uses the `{ status, message }` body the
//! reception scanner renders.

use attend_service::dto::{ScanRequest, ScanResponse};
use attend_service::{CheckInService, ServiceError};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{debug, error};

use crate::state::AppState;

/// Check in the holder of a scanned ticket
///
/// POST /api/scan
pub async fn scan(
    State(state): State<AppState>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> (StatusCode, Json<ScanResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(rejection = %rejection.body_text(), "Malformed scan body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ScanResponse::error("Invalid request body")),
            );
        }
    };

    match CheckInService::new(state.service_context()).scan(request).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => scan_failure(&e),
    }
}

pub(crate) fn scan_failure(err: &ServiceError) -> (StatusCode, Json<ScanResponse>) {
    let (status, message) = match err.error_code() {
        // A ticket that fails verification is refused like an unknown holder
        "INVALID_TOKEN" => (StatusCode::FORBIDDEN, "Invalid token".to_string()),
        "UNKNOWN_PARTICIPANT" => (StatusCode::FORBIDDEN, "Unknown participant".to_string()),
        _ => {
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!(error = %err, "Scan failed");
                (status, "Internal server error".to_string())
            } else {
                (status, err.to_string())
            }
        }
    };
    (status, Json(ScanResponse::error(message)))
}
