//! Role and unit settings read from the flat key/value configuration store

use std::collections::{HashMap, HashSet};

use crate::value_objects::parse_id_list;

/// Configuration keys understood by the resolvers
pub mod config_keys {
    pub const STAFF_ROLE_IDS: &str = "staff_role_ids";
    pub const ORGANIZER_ROLE_IDS: &str = "organizer_role_ids";
    pub const ADMIN_ROLE_IDS: &str = "admin_role_ids";
    pub const OPERATION_UNIT_ID: &str = "operation_guild_id";
    pub const TARGET_UNIT_IDS: &str = "target_guild_ids";
}

/// Parsed configuration for attribute, permission and unit resolution.
///
/// The id lists hold both group-role ids and, for permissions, direct
/// participant ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverSettings {
    pub staff_ids: HashSet<String>,
    pub organizer_ids: HashSet<String>,
    pub admin_ids: HashSet<String>,
    pub operation_unit_id: Option<String>,
    /// Empty means every unit is an attendance target
    pub target_unit_ids: Vec<String>,
}

impl ResolverSettings {
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        let list = |key: &str| -> Vec<String> {
            values.get(key).map(|v| parse_id_list(v)).unwrap_or_default()
        };

        Self {
            staff_ids: list(config_keys::STAFF_ROLE_IDS).into_iter().collect(),
            organizer_ids: list(config_keys::ORGANIZER_ROLE_IDS).into_iter().collect(),
            admin_ids: list(config_keys::ADMIN_ROLE_IDS).into_iter().collect(),
            operation_unit_id: values
                .get(config_keys::OPERATION_UNIT_ID)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            target_unit_ids: list(config_keys::TARGET_UNIT_IDS),
        }
    }

    pub fn is_operations_unit(&self, unit_id: &str) -> bool {
        self.operation_unit_id.as_deref() == Some(unit_id)
    }

    pub fn is_attendance_target(&self, unit_id: &str) -> bool {
        self.target_unit_ids.is_empty() || self.target_unit_ids.iter().any(|id| id == unit_id)
    }
}
