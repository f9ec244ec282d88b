//! Permission levels for the staff-facing surfaces

use std::collections::HashSet;

use serde::Serialize;

use super::ResolverSettings;
use crate::entities::{MembershipInfo, RoleUnitMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    None,
    Organizer,
    Staff,
    Admin,
}

impl PermissionLevel {
    /// Staff and admin see every unit
    pub fn sees_all_units(&self) -> bool {
        *self >= Self::Staff
    }
}

/// Highest level granted by a direct participant id or any held role id
pub fn determine_permission(
    participant_id: &str,
    role_ids: &HashSet<String>,
    settings: &ResolverSettings,
) -> PermissionLevel {
    let granted = |ids: &HashSet<String>| {
        ids.contains(participant_id) || role_ids.iter().any(|r| ids.contains(r))
    };

    if granted(&settings.admin_ids) {
        PermissionLevel::Admin
    } else if granted(&settings.staff_ids) {
        PermissionLevel::Staff
    } else if granted(&settings.organizer_ids) {
        PermissionLevel::Organizer
    } else {
        PermissionLevel::None
    }
}

/// Units an organizer may view, from the mappings of roles held in the
/// operations unit. Empty when there is no operations-unit membership.
pub fn organizer_scope(
    memberships: &[MembershipInfo],
    role_mappings: &[RoleUnitMapping],
) -> Vec<String> {
    let mut scope: Vec<String> = Vec::new();
    for membership in memberships.iter().filter(|m| m.is_operations_unit) {
        for role_id in membership.role_id_list() {
            let Some(mapping) = role_mappings.iter().find(|m| m.role_id == role_id) else {
                continue;
            };
            for target in mapping.targets() {
                if !scope.contains(&target) {
                    scope.push(target);
                }
            }
        }
    }
    scope
}
