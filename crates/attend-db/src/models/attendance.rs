//! Attendance record database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for attendance_records table
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceModel {
    pub participant_id: String,
    pub check_in_date: NaiveDate,
    pub checked_in_at: DateTime<Utc>,
    pub unit_id: Option<String>,
    pub attribute: String,
    pub method: Option<String>,
}
