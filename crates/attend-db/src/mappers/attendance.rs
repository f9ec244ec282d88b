//! AttendanceRecord entity <-> model mapper

use chrono::{DateTime, NaiveDate, Utc};

use attend_core::entities::AttendanceRecord;
use attend_core::error::DomainError;
use attend_core::value_objects::{CheckInMethod, CivilDate};

use super::parse_attribute;
use crate::models::AttendanceModel;

impl TryFrom<AttendanceModel> for AttendanceRecord {
    type Error = DomainError;

    fn try_from(model: AttendanceModel) -> Result<Self, Self::Error> {
        Ok(AttendanceRecord {
            attribute: parse_attribute(&model.attribute)?,
            method: CheckInMethod::from_stored(model.method.as_deref()),
            participant_id: model.participant_id,
            check_in_date: CivilDate::new(model.check_in_date),
            checked_in_at: model.checked_in_at,
            unit_id: model.unit_id,
        })
    }
}

/// AttendanceRecord values for database insertion
pub struct AttendanceInsert {
    pub participant_id: String,
    pub check_in_date: NaiveDate,
    pub checked_in_at: DateTime<Utc>,
    pub unit_id: Option<String>,
    pub attribute: &'static str,
    pub method: &'static str,
}

impl AttendanceInsert {
    pub fn new(record: &AttendanceRecord) -> Self {
        Self {
            participant_id: record.participant_id.clone(),
            check_in_date: record.check_in_date.as_naive(),
            checked_in_at: record.checked_in_at,
            unit_id: record.unit_id.clone(),
            attribute: record.attribute.as_str(),
            method: record.method.as_str(),
        }
    }
}
