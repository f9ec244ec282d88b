//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Export payloads
//! use camelCase keys for the spreadsheet consumer.

use std::collections::BTreeMap;

use attend_core::{Attribute, CheckInMethod, CivilDate, PrimaryUnit};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Scan Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Ok,
    Duplicate,
    Error,
}

/// Body of `POST /api/scan` and `POST /api/checkin/manual`
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub status: ScanStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_method: Option<CheckInMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ScanUser>,
}

impl ScanResponse {
    pub fn ok(user: ScanUser) -> Self {
        Self {
            status: ScanStatus::Ok,
            message: "Checked in".to_string(),
            existing_method: None,
            user: Some(user),
        }
    }

    pub fn duplicate(user: ScanUser, existing_method: Option<CheckInMethod>) -> Self {
        Self {
            status: ScanStatus::Duplicate,
            message: "Already checked in today".to_string(),
            existing_method,
            user: Some(user),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Error,
            message: message.into(),
            existing_method: None,
            user: None,
        }
    }
}

/// Participant shown on the scanner after a check-in attempt
#[derive(Debug, Clone, Serialize)]
pub struct ScanUser {
    pub participant_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub attribute: Attribute,
    pub primary_unit: PrimaryUnit,
    pub units: Vec<ScanUnit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanUnit {
    pub unit_id: String,
    pub unit_name: String,
    pub default_color: String,
    pub nickname: Option<String>,
}

// ============================================================================
// Ticket Responses
// ============================================================================

/// Body of `GET /api/tickets/@me`
#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub participant_id: String,
    pub display_name: Option<String>,
    pub attribute: Attribute,
    pub ticket_token: String,
}

// ============================================================================
// Export Responses
// ============================================================================

/// Per-date attendance report
#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub date: CivilDate,
    pub members: Vec<ExportMember>,
    pub guilds: Vec<ExportUnit>,
    pub summary: ExportSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMember {
    pub participant_id: String,
    pub global_name: String,
    pub nickname: String,
    pub guild_id: String,
    pub guild_name: String,
    pub attribute: Attribute,
    pub attended: bool,
    pub check_in_timestamp: Option<DateTime<Utc>>,
    pub check_in_method: Option<CheckInMethod>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportUnit {
    pub guild_id: String,
    pub guild_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExportSummary {
    pub total: usize,
    pub attended: usize,
    pub absent: usize,
}

/// Attendance of every participant seen in a date range
#[derive(Debug, Clone, Serialize)]
pub struct RangeExportResponse {
    pub start: CivilDate,
    pub end: CivilDate,
    pub dates: Vec<CivilDate>,
    pub members: Vec<RangeExportMember>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeExportMember {
    pub participant_id: String,
    pub global_name: String,
    /// Keyed by `YYYY-MM-DD`; days without a check-in are absent
    pub attendance: BTreeMap<CivilDate, RangeExportDay>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeExportDay {
    pub check_in_timestamp: DateTime<Utc>,
    pub method: CheckInMethod,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Healthy,
    Unhealthy,
    /// Backend not configured; the in-process fallback is in use
    Disabled,
}

impl CheckStatus {
    pub fn from_check(result: Option<bool>) -> Self {
        match result {
            Some(true) => Self::Healthy,
            Some(false) => Self::Unhealthy,
            None => Self::Disabled,
        }
    }
}

/// Health check status for each backend
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub redis: CheckStatus,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

impl ReadinessResponse {
    /// `None` marks a backend that is not configured
    pub fn ready(database: Option<bool>, redis: Option<bool>) -> Self {
        let checks = HealthChecks {
            database: CheckStatus::from_check(database),
            redis: CheckStatus::from_check(redis),
        };
        let all_healthy =
            checks.database != CheckStatus::Unhealthy && checks.redis != CheckStatus::Unhealthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
