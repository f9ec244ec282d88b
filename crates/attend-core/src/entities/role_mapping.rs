//! Role → unit mapping for organizers

use crate::value_objects::parse_id_list;

/// Maps one organizer role to the units it represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUnitMapping {
    pub role_id: String,
    /// Comma-separated unit ids
    pub target_unit_ids: String,
}

impl RoleUnitMapping {
    pub fn new(role_id: impl Into<String>, target_unit_ids: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            target_unit_ids: target_unit_ids.into(),
        }
    }

    /// Target unit ids in configured order
    pub fn targets(&self) -> Vec<String> {
        parse_id_list(&self.target_unit_ids)
    }
}
