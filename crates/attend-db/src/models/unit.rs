//! Unit database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for units table
#[derive(Debug, Clone, FromRow)]
pub struct UnitModel {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub color: String,
    pub is_attendance_target: bool,
    pub is_operations_unit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
