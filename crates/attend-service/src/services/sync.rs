//! Membership sync
//!
//! Consumes unit and member snapshots from the identity provider and keeps
//! participants, units and memberships current. The attribute is recomputed
//! over all of a participant's memberships after each change.

use attend_core::entities::{MembershipInfo, Participant, Unit, UnitMembership};
use attend_core::resolver::{collect_role_ids, determine_attribute};
use attend_core::{Attribute, ResolverSettings};
use tracing::{info, instrument, warn};

use crate::dto::{MemberSnapshot, UnitSnapshot};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Membership sync service
pub struct SyncService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SyncService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sync every member of a unit; bots are skipped. Returns the number synced.
    #[instrument(skip(self, unit, members), fields(unit_id = %unit.unit_id, members = members.len()))]
    pub async fn observe_unit(
        &self,
        unit: &UnitSnapshot,
        members: &[MemberSnapshot],
    ) -> ServiceResult<usize> {
        let settings = self.ctx.resolver_settings().await?;
        self.upsert_unit(unit, &settings).await?;

        let mut synced = 0;
        for member in members.iter().filter(|m| !m.is_bot) {
            self.upsert_member(&unit.unit_id, member, &settings).await?;
            synced += 1;
        }
        info!(synced, "Unit synced");
        Ok(synced)
    }

    /// Record one member as seen in a unit. Returns the resulting attribute,
    /// or `None` for bots.
    #[instrument(skip(self, unit, member), fields(unit_id = %unit.unit_id, participant_id = %member.participant_id))]
    pub async fn observe_member(
        &self,
        unit: &UnitSnapshot,
        member: &MemberSnapshot,
    ) -> ServiceResult<Option<Attribute>> {
        if member.is_bot {
            return Ok(None);
        }
        let settings = self.ctx.resolver_settings().await?;
        self.upsert_unit(unit, &settings).await?;
        self.upsert_member(&unit.unit_id, member, &settings).await.map(Some)
    }

    /// Drop the membership and recompute the attribute from what remains
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        unit_id: &str,
        participant_id: &str,
    ) -> ServiceResult<bool> {
        let removed = self
            .ctx
            .membership_repo()
            .delete(participant_id, unit_id)
            .await?;
        if !removed {
            return Ok(false);
        }

        if let Some(participant) = self.ctx.participant_repo().find_by_id(participant_id).await? {
            let settings = self.ctx.resolver_settings().await?;
            self.recompute(&participant, &settings).await?;
        }
        info!("Membership removed");
        Ok(true)
    }

    async fn upsert_unit(&self, snapshot: &UnitSnapshot, settings: &ResolverSettings) -> ServiceResult<()> {
        let mut unit = Unit::new(&snapshot.unit_id, &snapshot.name).with_flags(
            settings.is_attendance_target(&snapshot.unit_id),
            settings.is_operations_unit(&snapshot.unit_id),
        );
        unit.icon_url.clone_from(&snapshot.icon_url);
        self.ctx.unit_repo().upsert(&unit).await?;
        Ok(())
    }

    async fn upsert_member(
        &self,
        unit_id: &str,
        member: &MemberSnapshot,
        settings: &ResolverSettings,
    ) -> ServiceResult<Attribute> {
        let participant = match self.ctx.participant_repo().find_by_id(&member.participant_id).await? {
            Some(mut existing) => {
                existing.set_profile(member.display_name.clone(), member.avatar_url.clone());
                existing
            }
            None => {
                info!(participant_id = %member.participant_id, "First sighting of participant");
                Participant::new(
                    &member.participant_id,
                    member.display_name.clone(),
                    member.avatar_url.clone(),
                )
            }
        };
        self.ctx.participant_repo().upsert(&participant).await?;

        let mut membership =
            UnitMembership::new(&member.participant_id, unit_id).with_roles(&member.role_ids);
        membership.nickname.clone_from(&member.nickname);
        membership.avatar_url.clone_from(&member.avatar_url);
        self.ctx.membership_repo().upsert(&membership).await?;

        self.recompute(&participant, settings).await
    }

    async fn recompute(
        &self,
        participant: &Participant,
        settings: &ResolverSettings,
    ) -> ServiceResult<Attribute> {
        let memberships = self
            .ctx
            .membership_repo()
            .find_by_participant(&participant.id)
            .await?;
        warn_on_multiple_targets(&participant.id, &memberships);

        let attribute = determine_attribute(&collect_role_ids(&memberships), settings);
        if attribute != participant.attribute {
            info!(
                participant_id = %participant.id,
                from = %participant.attribute,
                to = %attribute,
                "Attribute changed"
            );
            self.ctx
                .participant_repo()
                .update_attribute(&participant.id, attribute)
                .await?;
        }
        Ok(attribute)
    }
}

/// Check-ins resolve to the first target membership; flag the ambiguity here
fn warn_on_multiple_targets(participant_id: &str, memberships: &[MembershipInfo]) {
    let targets: Vec<&str> = memberships
        .iter()
        .filter(|m| m.is_attendance_target)
        .map(|m| m.unit_id.as_str())
        .collect();
    if targets.len() > 1 {
        warn!(
            participant_id,
            units = ?targets,
            resolved = targets[0],
            "Participant belongs to more than one attendance-target unit"
        );
    }
}
