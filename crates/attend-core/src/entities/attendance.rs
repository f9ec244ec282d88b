//! Attendance record - one check-in per participant per civil date

use chrono::{DateTime, Utc};

use crate::value_objects::{Attribute, CheckInMethod, CivilDate};

/// Attendance record, unique per `(participant_id, check_in_date)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub participant_id: String,
    pub check_in_date: CivilDate,
    pub checked_in_at: DateTime<Utc>,
    /// Unit the attendance is attributed to
    pub unit_id: Option<String>,
    /// Attribute at the time of check-in
    pub attribute: Attribute,
    pub method: CheckInMethod,
}

impl AttendanceRecord {
    pub fn new(
        participant_id: impl Into<String>,
        check_in_date: CivilDate,
        checked_in_at: DateTime<Utc>,
        unit_id: Option<String>,
        attribute: Attribute,
        method: CheckInMethod,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            check_in_date,
            checked_in_at,
            unit_id,
            attribute,
            method,
        }
    }
}
