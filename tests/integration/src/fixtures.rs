//! Test fixtures and data generators
//!
//! Seeds participants through the same services the identity-provider sync
//! and login flows use, and mirrors the JSON bodies the API returns.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use attend_api::AppState;
use attend_core::resolver::config_keys;
use attend_service::dto::{IdentityProfile, MemberSnapshot, UnitSnapshot};
use attend_service::{LoginService, SyncService, TicketService};
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Role granting staff level in the seeded configuration
pub const STAFF_ROLE: &str = "role-staff";
pub const OPS_UNIT: &str = "unit-ops";
pub const TARGET_UNIT: &str = "unit-a";

/// A participant seeded into a running server
#[derive(Debug, Clone)]
pub struct SeededParticipant {
    pub id: String,
    pub ticket: String,
    pub session: String,
}

/// Configure staff roles and the operations unit
pub async fn configure_roles(state: &AppState) -> Result<()> {
    let config = state.service_context().config_repo();
    config.set(config_keys::STAFF_ROLE_IDS, STAFF_ROLE).await?;
    config.set(config_keys::OPERATION_UNIT_ID, OPS_UNIT).await?;
    config.set(config_keys::TARGET_UNIT_IDS, TARGET_UNIT).await?;
    Ok(())
}

/// Sync a participant into `unit_id` with `roles`, sign their ticket and log
/// them in
pub async fn seed_participant(state: &AppState, unit_id: &str, roles: &[&str]) -> Result<SeededParticipant> {
    let id = format!("{}", 100_000 + unique_suffix());
    let ctx = state.service_context();

    SyncService::new(ctx)
        .observe_member(
            &UnitSnapshot {
                unit_id: unit_id.to_string(),
                name: format!("Unit {unit_id}"),
                icon_url: None,
            },
            &MemberSnapshot {
                participant_id: id.clone(),
                display_name: Some(format!("Participant {id}")),
                avatar_url: None,
                nickname: None,
                role_ids: roles.iter().map(|r| (*r).to_string()).collect(),
                is_bot: false,
            },
        )
        .await?;

    let ticket = TicketService::new(ctx).ensure_valid_ticket(&id).await?;
    let login = LoginService::new(ctx)
        .complete_login(IdentityProfile {
            id: id.clone(),
            username: format!("user{id}"),
            global_name: Some(format!("Participant {id}")),
            avatar_url: None,
        })
        .await?;

    Ok(SeededParticipant {
        id,
        ticket,
        session: login.session_token,
    })
}

/// Scan or manual check-in request
#[derive(Debug, Serialize)]
pub struct ScanRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ManualCheckInRequest {
    pub participant_id: String,
}

/// Session hand-off request
#[derive(Debug, Serialize)]
pub struct SessionRequest {
    pub session_token: String,
}

/// Check-in response
#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub status: String,
    pub message: String,
    pub existing_method: Option<String>,
    pub user: Option<ScanUserBody>,
}

#[derive(Debug, Deserialize)]
pub struct ScanUserBody {
    pub participant_id: String,
    pub attribute: String,
    pub primary_unit: PrimaryUnitBody,
}

#[derive(Debug, Deserialize)]
pub struct PrimaryUnitBody {
    pub unit_id: Option<String>,
}

/// Ticket response
#[derive(Debug, Deserialize)]
pub struct TicketBody {
    pub participant_id: String,
    pub ticket_token: String,
}

/// Per-date export response
#[derive(Debug, Deserialize)]
pub struct ExportBody {
    pub date: String,
    pub members: Vec<ExportMemberBody>,
    pub summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMemberBody {
    pub participant_id: String,
    pub attended: bool,
    pub check_in_method: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct SummaryBody {
    pub total: usize,
    pub attended: usize,
    pub absent: usize,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
