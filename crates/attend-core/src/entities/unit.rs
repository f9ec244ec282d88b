//! Unit entity - an organizational group ("guild") participants belong to

use chrono::{DateTime, Utc};

/// Palette for units that have no configured color
const DEFAULT_COLORS: [&str; 7] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4",
];

/// Organizational unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub color: String,
    /// Attendance is tracked for members of this unit
    pub is_attendance_target: bool,
    /// Staff and organizer role assignments are authoritative here
    pub is_operations_unit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            color: default_color(&id).to_string(),
            id,
            name: name.into(),
            icon_url: None,
            is_attendance_target: true,
            is_operations_unit: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_flags(mut self, is_attendance_target: bool, is_operations_unit: bool) -> Self {
        self.is_attendance_target = is_attendance_target;
        self.is_operations_unit = is_operations_unit;
        self
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}

/// Stable palette color picked from the last four hex digits of the id
pub fn default_color(unit_id: &str) -> &'static str {
    let tail_start = unit_id.len().saturating_sub(4);
    let index = unit_id
        .get(tail_start..)
        .and_then(|tail| u32::from_str_radix(tail, 16).ok())
        .unwrap_or(0) as usize;
    DEFAULT_COLORS[index % DEFAULT_COLORS.len()]
}
