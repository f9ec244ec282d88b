//! Role mapping database model

use sqlx::FromRow;

/// Database model for role_unit_mappings table
#[derive(Debug, Clone, FromRow)]
pub struct RoleMappingModel {
    pub role_id: String,
    pub target_unit_ids: String,
}
