//! Primary-unit resolution
//!
//! Picks the one unit an attendance is reported under. Resolution depends only
//! on its inputs and on the order of `memberships`.

use serde::Serialize;

use crate::entities::{MembershipInfo, RoleUnitMapping};
use crate::value_objects::Attribute;

/// Unit a participant is attributed to; `unit_id` is `None` when unresolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryUnit {
    pub unit_id: Option<String>,
    pub unit_name: String,
}

impl PrimaryUnit {
    fn of(membership: &MembershipInfo) -> Self {
        Self {
            unit_id: Some(membership.unit_id.clone()),
            unit_name: membership.unit_name.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.unit_id.is_some()
    }
}

pub fn resolve_primary_unit(
    memberships: &[MembershipInfo],
    attribute: Attribute,
    role_mappings: &[RoleUnitMapping],
) -> PrimaryUnit {
    let resolved = match attribute {
        Attribute::Staff => memberships
            .iter()
            .find(|m| m.is_operations_unit)
            .or_else(|| first_target(memberships)),
        Attribute::Organizer => {
            organizer_unit(memberships, role_mappings).or_else(|| first_target(memberships))
        }
        Attribute::Participant => first_target(memberships),
    };

    resolved.map(PrimaryUnit::of).unwrap_or_default()
}

fn first_target(memberships: &[MembershipInfo]) -> Option<&MembershipInfo> {
    memberships.iter().find(|m| m.is_attendance_target)
}

/// First mapped target unit the participant belongs to, walking role ids in
/// membership order and each mapping's targets in configured order
fn organizer_unit<'a>(
    memberships: &'a [MembershipInfo],
    role_mappings: &[RoleUnitMapping],
) -> Option<&'a MembershipInfo> {
    memberships
        .iter()
        .flat_map(MembershipInfo::role_id_list)
        .filter_map(|role_id| role_mappings.iter().find(|m| m.role_id == role_id))
        .flat_map(RoleUnitMapping::targets)
        .find_map(|target| memberships.iter().find(|m| m.unit_id == target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(unit: &str, target: bool, ops: bool, roles: &str) -> MembershipInfo {
        MembershipInfo {
            unit_id: unit.to_string(),
            unit_name: format!("Unit {unit}"),
            is_attendance_target: target,
            is_operations_unit: ops,
            nickname: None,
            role_ids: roles.to_string(),
        }
    }

    #[test]
    fn test_staff_prefers_operations_unit() {
        let memberships = vec![
            membership("g1", true, false, "[]"),
            membership("ops", false, true, r#"["staff","org"]"#),
        ];
        let unit = resolve_primary_unit(&memberships, Attribute::Staff, &[]);
        assert_eq!(unit.unit_id.as_deref(), Some("ops"));
        assert_eq!(unit.unit_name, "Unit ops");
    }

    #[test]
    fn test_staff_falls_back_to_target() {
        let memberships = vec![
            membership("x", false, false, "[]"),
            membership("g1", true, false, "[]"),
        ];
        let unit = resolve_primary_unit(&memberships, Attribute::Staff, &[]);
        assert_eq!(unit.unit_id.as_deref(), Some("g1"));
    }

    #[test]
    fn test_organizer_uses_mapping_order() {
        let memberships = vec![
            membership("g1", true, false, "[]"),
            membership("g2", true, false, "[]"),
            membership("ops", false, true, r#"["r-none","r-org"]"#),
        ];
        let mappings = vec![
            RoleUnitMapping::new("r-org", "g9,g2,g1"),
            RoleUnitMapping::new("r-other", "g1"),
        ];
        let unit = resolve_primary_unit(&memberships, Attribute::Organizer, &mappings);
        assert_eq!(unit.unit_id.as_deref(), Some("g2"));
    }

    #[test]
    fn test_organizer_without_mapping_falls_back() {
        let memberships = vec![
            membership("ops", false, true, r#"["r-org"]"#),
            membership("g1", true, false, "[]"),
        ];
        let unit = resolve_primary_unit(&memberships, Attribute::Organizer, &[]);
        assert_eq!(unit.unit_id.as_deref(), Some("g1"));
    }

    #[test]
    fn test_participant_first_target_is_stable() {
        let memberships = vec![
            membership("ops", false, true, "[]"),
            membership("g2", true, false, "[]"),
            membership("g1", true, false, "[]"),
        ];
        let first = resolve_primary_unit(&memberships, Attribute::Participant, &[]);
        let second = resolve_primary_unit(&memberships, Attribute::Participant, &[]);
        assert_eq!(first, second);
        assert_eq!(first.unit_id.as_deref(), Some("g2"));
    }

    #[test]
    fn test_unresolved() {
        let memberships = vec![membership("x", false, false, "[]")];
        let unit = resolve_primary_unit(&memberships, Attribute::Participant, &[]);
        assert!(!unit.is_resolved());
        assert_eq!(unit.unit_name, "");
    }
}
