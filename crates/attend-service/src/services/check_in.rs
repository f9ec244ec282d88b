//! Check-in pipeline
//!
//! Ticket → verified subject → participant and memberships → attribute
//! refreshed when stale → primary unit → ledger write → `ok` or `duplicate`.

use attend_core::entities::{MembershipInfo, Participant};
use attend_core::resolver::{collect_role_ids, determine_attribute, resolve_primary_unit};
use attend_core::{Attribute, CheckInMethod, PermissionLevel, PrimaryUnit};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{ManualCheckInRequest, ScanRequest, ScanResponse, ScanUnit, ScanUser};

use super::attendance::AttendanceService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Check-in service
pub struct CheckInService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CheckInService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check in the holder of a scanned ticket
    #[instrument(skip(self, request))]
    pub async fn scan(&self, request: ScanRequest) -> ServiceResult<ScanResponse> {
        request.validate()?;

        let Some(verified) = self.ctx.ticket_codec().verify(&request.token) else {
            warn!("Rejected ticket that failed verification");
            return Err(ServiceError::invalid_token());
        };
        debug!(participant_id = %verified.subject_id, format = ?verified.format, "Ticket verified");

        self.check_in(&verified.subject_id, CheckInMethod::Scan).await
    }

    /// Check in a participant by id on behalf of a staff operator
    #[instrument(skip(self, request), fields(participant_id = %request.participant_id))]
    pub async fn manual(
        &self,
        operator_id: &str,
        request: ManualCheckInRequest,
    ) -> ServiceResult<ScanResponse> {
        request.validate()?;
        PermissionService::new(self.ctx)
            .require(operator_id, PermissionLevel::Staff)
            .await?;

        let response = self
            .check_in(&request.participant_id, CheckInMethod::Manual)
            .await?;
        info!(operator_id, status = ?response.status, "Manual check-in handled");
        Ok(response)
    }

    async fn check_in(
        &self,
        participant_id: &str,
        method: CheckInMethod,
    ) -> ServiceResult<ScanResponse> {
        let mut participant = self
            .ctx
            .participant_repo()
            .find_by_id(participant_id)
            .await?
            .ok_or_else(|| {
                warn!(participant_id, "Check-in for unknown participant");
                ServiceError::unknown_participant()
            })?;

        let memberships = self
            .ctx
            .membership_repo()
            .find_by_participant(participant_id)
            .await?;

        let attribute = self.refresh_attribute(&mut participant, &memberships).await?;
        let primary_unit = self.primary_unit(&memberships, attribute).await?;

        let result = AttendanceService::new(self.ctx)
            .check_in(
                participant_id,
                primary_unit.unit_id.clone(),
                attribute,
                method,
            )
            .await?;

        let user = scan_user(&participant, &memberships, primary_unit);
        if result.is_new_check_in {
            Ok(ScanResponse::ok(user))
        } else {
            Ok(ScanResponse::duplicate(user, result.existing_method))
        }
    }

    /// Recompute the attribute and persist it when the stored one is stale
    async fn refresh_attribute(
        &self,
        participant: &mut Participant,
        memberships: &[MembershipInfo],
    ) -> ServiceResult<Attribute> {
        let settings = self.ctx.resolver_settings().await?;
        let roles = collect_role_ids(memberships);
        let attribute = determine_attribute(&roles, &settings);

        if attribute != participant.attribute {
            info!(
                participant_id = %participant.id,
                from = %participant.attribute,
                to = %attribute,
                "Attribute refreshed at check-in"
            );
            self.ctx
                .participant_repo()
                .update_attribute(&participant.id, attribute)
                .await?;
            participant.set_attribute(attribute);
        }
        Ok(attribute)
    }

    async fn primary_unit(
        &self,
        memberships: &[MembershipInfo],
        attribute: Attribute,
    ) -> ServiceResult<PrimaryUnit> {
        let mappings = if attribute.is_organizer() {
            let mut role_ids: Vec<String> = Vec::new();
            for role_id in memberships.iter().flat_map(MembershipInfo::role_id_list) {
                if !role_ids.contains(&role_id) {
                    role_ids.push(role_id);
                }
            }
            self.ctx.role_mapping_repo().find_by_roles(&role_ids).await?
        } else {
            Vec::new()
        };

        let primary = resolve_primary_unit(memberships, attribute, &mappings);
        if !primary.is_resolved() {
            debug!(%attribute, "No primary unit resolved");
        }
        Ok(primary)
    }
}

fn scan_user(
    participant: &Participant,
    memberships: &[MembershipInfo],
    primary_unit: PrimaryUnit,
) -> ScanUser {
    ScanUser {
        participant_id: participant.id.clone(),
        display_name: participant.display_name.clone(),
        avatar_url: participant.avatar_url.clone(),
        attribute: participant.attribute,
        primary_unit,
        units: memberships
            .iter()
            .filter(|m| m.is_attendance_target)
            .map(ScanUnit::from)
            .collect(),
    }
}
