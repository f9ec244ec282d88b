//! Membership database models

use sqlx::FromRow;

/// Membership joined with its unit flags
#[derive(Debug, Clone, FromRow)]
pub struct MembershipInfoModel {
    pub unit_id: String,
    pub unit_name: String,
    pub is_attendance_target: bool,
    pub is_operations_unit: bool,
    pub nickname: Option<String>,
    pub role_ids: String,
}

/// Membership joined with participant and unit, for target listings
#[derive(Debug, Clone, FromRow)]
pub struct TargetMemberModel {
    pub participant_id: String,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub attribute: String,
    pub unit_id: String,
    pub unit_name: String,
}
