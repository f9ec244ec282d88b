//! Manual check-in handler

use attend_service::dto::{ManualCheckInRequest, ScanResponse};
use attend_service::CheckInService;
use axum::{extract::State, Json};

use crate::extractors::{SessionUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Check in a participant by id; the session holder must be staff or above
///
/// POST /api/checkin/manual
pub async fn manual_check_in(
    State(state): State<AppState>,
    session: SessionUser,
    ValidatedJson(request): ValidatedJson<ManualCheckInRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let response = CheckInService::new(state.service_context())
        .manual(&session.participant_id, request)
        .await?;
    Ok(Json(response))
}
