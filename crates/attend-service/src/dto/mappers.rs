//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use attend_core::entities::{default_color, MembershipInfo, Participant, Unit};

use super::responses::{ExportSummary, ExportUnit, ScanUnit, TicketResponse};
use crate::services::AttendanceSummary;

impl From<&MembershipInfo> for ScanUnit {
    fn from(membership: &MembershipInfo) -> Self {
        Self {
            unit_id: membership.unit_id.clone(),
            unit_name: membership.unit_name.clone(),
            default_color: default_color(&membership.unit_id).to_string(),
            nickname: membership.nickname.clone(),
        }
    }
}

impl From<&Unit> for ExportUnit {
    fn from(unit: &Unit) -> Self {
        Self {
            guild_id: unit.id.clone(),
            guild_name: unit.name.clone(),
        }
    }
}

impl From<AttendanceSummary> for ExportSummary {
    fn from(summary: AttendanceSummary) -> Self {
        Self {
            total: summary.total,
            attended: summary.present,
            absent: summary.absent,
        }
    }
}

impl From<&Participant> for TicketResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            attribute: participant.attribute,
            ticket_token: participant.ticket_token.clone(),
        }
    }
}
