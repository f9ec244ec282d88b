//! Permission service
//!
//! Resolves `none < organizer < staff < admin` from configured role ids and
//! direct participant ids, and the units an organizer may view.

use attend_core::resolver::{collect_role_ids, determine_permission, organizer_scope};
use attend_core::PermissionLevel;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Units visible to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitScope {
    All,
    Units(Vec<String>),
}

impl UnitScope {
    pub fn allows(&self, unit_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Units(ids) => ids.iter().any(|id| id == unit_id),
        }
    }
}

/// Permission service
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn level(&self, participant_id: &str) -> ServiceResult<PermissionLevel> {
        let settings = self.ctx.resolver_settings().await?;
        let memberships = self
            .ctx
            .membership_repo()
            .find_by_participant(participant_id)
            .await?;
        let roles = collect_role_ids(&memberships);

        let level = determine_permission(participant_id, &roles, &settings);
        debug!(?level, "Permission resolved");
        Ok(level)
    }

    /// Fails unless the participant holds `required` or above
    #[instrument(skip(self))]
    pub async fn require(
        &self,
        participant_id: &str,
        required: PermissionLevel,
    ) -> ServiceResult<PermissionLevel> {
        let level = self.level(participant_id).await?;
        if level < required {
            warn!(participant_id, ?level, ?required, "Permission denied");
            return Err(ServiceError::permission_denied(required));
        }
        Ok(level)
    }

    #[instrument(skip(self))]
    pub async fn unit_scope(&self, participant_id: &str) -> ServiceResult<UnitScope> {
        let level = self.level(participant_id).await?;
        if level.sees_all_units() {
            return Ok(UnitScope::All);
        }
        if level == PermissionLevel::None {
            return Ok(UnitScope::Units(Vec::new()));
        }

        let memberships = self
            .ctx
            .membership_repo()
            .find_by_participant(participant_id)
            .await?;
        let operation_roles: Vec<String> = memberships
            .iter()
            .filter(|m| m.is_operations_unit)
            .flat_map(|m| m.role_id_list())
            .collect();
        let mappings = self
            .ctx
            .role_mapping_repo()
            .find_by_roles(&operation_roles)
            .await?;

        Ok(UnitScope::Units(organizer_scope(&memberships, &mappings)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::context::testing::{fixture, Fixture};
    use attend_core::entities::{Participant, RoleUnitMapping, Unit, UnitMembership};
    use attend_core::resolver::config_keys;

    async fn seed(fixture: &Fixture) {
        let ctx = &fixture.ctx;
        let config = ctx.config_repo();
        config.set(config_keys::ADMIN_ROLE_IDS, "admin-user").await.unwrap();
        config.set(config_keys::STAFF_ROLE_IDS, "r-staff").await.unwrap();
        config.set(config_keys::ORGANIZER_ROLE_IDS, "r-org").await.unwrap();

        ctx.unit_repo().upsert(&Unit::new("ops", "Ops").with_flags(false, true)).await.unwrap();
        ctx.unit_repo().upsert(&Unit::new("g1", "G1")).await.unwrap();
        ctx.role_mapping_repo().upsert(&RoleUnitMapping::new("r-org", "g1,g2")).await.unwrap();

        for (id, roles) in [("staff", "r-staff"), ("org", "r-org"), ("plain", "r-none")] {
            ctx.participant_repo().upsert(&Participant::new(id, None, None)).await.unwrap();
            ctx.membership_repo()
                .upsert(&UnitMembership::new(id, "ops").with_roles(&[roles.to_string()]))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_levels() {
        let fixture = fixture();
        seed(&fixture).await;
        let service = PermissionService::new(&fixture.ctx);

        assert_eq!(service.level("admin-user").await.unwrap(), PermissionLevel::Admin);
        assert_eq!(service.level("staff").await.unwrap(), PermissionLevel::Staff);
        assert_eq!(service.level("org").await.unwrap(), PermissionLevel::Organizer);
        assert_eq!(service.level("plain").await.unwrap(), PermissionLevel::None);
    }

    #[tokio::test]
    async fn test_require() {
        let fixture = fixture();
        seed(&fixture).await;
        let service = PermissionService::new(&fixture.ctx);

        assert!(service.require("staff", PermissionLevel::Staff).await.is_ok());
        assert!(service.require("admin-user", PermissionLevel::Staff).await.is_ok());
        let err = service.require("org", PermissionLevel::Staff).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_unit_scope() {
        let fixture = fixture();
        seed(&fixture).await;
        let service = PermissionService::new(&fixture.ctx);

        assert_eq!(service.unit_scope("staff").await.unwrap(), UnitScope::All);
        let scope = service.unit_scope("org").await.unwrap();
        assert_eq!(scope, UnitScope::Units(vec!["g1".to_string(), "g2".to_string()]));
        assert!(scope.allows("g2"));
        assert!(!scope.allows("g3"));
        assert_eq!(service.unit_scope("plain").await.unwrap(), UnitScope::Units(vec![]));
    }
}
