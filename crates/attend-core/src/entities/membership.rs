//! Unit membership - a participant's presence in one unit

use chrono::{DateTime, Utc};

use crate::value_objects::{encode_role_ids, parse_role_ids};

/// Membership row, unique per `(participant_id, unit_id)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMembership {
    pub participant_id: String,
    pub unit_id: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    /// JSON array snapshot of group-role ids within the unit
    pub role_ids: String,
    pub updated_at: DateTime<Utc>,
}

impl UnitMembership {
    pub fn new(participant_id: impl Into<String>, unit_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            unit_id: unit_id.into(),
            nickname: None,
            avatar_url: None,
            role_ids: "[]".to_string(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_roles(mut self, role_ids: &[String]) -> Self {
        self.role_ids = encode_role_ids(role_ids);
        self
    }

    /// Decoded role ids; malformed snapshots decode to nothing
    pub fn role_id_list(&self) -> Vec<String> {
        parse_role_ids(&self.role_ids)
    }
}

/// Membership joined with the flags of its unit, as consumed by the resolvers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipInfo {
    pub unit_id: String,
    pub unit_name: String,
    pub is_attendance_target: bool,
    pub is_operations_unit: bool,
    pub nickname: Option<String>,
    pub role_ids: String,
}

impl MembershipInfo {
    pub fn from_parts(membership: &UnitMembership, unit: &crate::entities::Unit) -> Self {
        Self {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            is_attendance_target: unit.is_attendance_target,
            is_operations_unit: unit.is_operations_unit,
            nickname: membership.nickname.clone(),
            role_ids: membership.role_ids.clone(),
        }
    }

    pub fn role_id_list(&self) -> Vec<String> {
        parse_role_ids(&self.role_ids)
    }
}

/// Participant listed through an attendance-target membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMember {
    pub participant_id: String,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub attribute: crate::value_objects::Attribute,
    pub unit_id: String,
    pub unit_name: String,
}

impl TargetMember {
    /// Unit nickname, then display name, then id
    pub fn name(&self) -> &str {
        self.nickname
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.participant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_snapshot() {
        let m = UnitMembership::new("u1", "g1").with_roles(&["r1".to_string(), "r2".to_string()]);
        assert_eq!(m.role_id_list(), vec!["r1", "r2"]);
    }

    #[test]
    fn test_malformed_snapshot() {
        let mut m = UnitMembership::new("u1", "g1");
        m.role_ids = "{broken".to_string();
        assert!(m.role_id_list().is_empty());
    }
}
