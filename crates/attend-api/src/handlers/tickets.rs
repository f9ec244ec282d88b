//! Ticket handlers

use attend_service::dto::TicketResponse;
use attend_service::TicketService;
use axum::{extract::State, Json};

use crate::extractors::SessionUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// The session holder's ticket, signed first if it is still a placeholder
///
/// GET /api/tickets/@me
pub async fn my_ticket(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = TicketService::new(state.service_context())
        .my_ticket(&session.participant_id)
        .await?;
    Ok(Json(ticket))
}
