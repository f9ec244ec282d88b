//! Attendance ledger
//!
//! One record per participant per civil date. A participant goes from absent
//! to present once per day and never back. Reads happen before the insert,
//! but the storage-level unique key on `(participant_id, check_in_date)` is
//! what decides a race: a rejected insert is reported as a duplicate.

use std::collections::{BTreeMap, HashSet};

use attend_core::entities::AttendanceRecord;
use attend_core::traits::{AttendanceQuery, MemberQuery};
use attend_core::{Attribute, CheckInMethod, CivilDate, DomainError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Longest range accepted by [`AttendanceService::attendance_by_date_range`]
pub const MAX_RANGE_DAYS: i64 = 366;

/// Whether a participant has a record on a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CheckInMethod>,
}

/// Outcome of a check-in attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInResult {
    pub success: bool,
    pub is_new_check_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_method: Option<CheckInMethod>,
}

impl CheckInResult {
    fn created() -> Self {
        Self {
            success: true,
            is_new_check_in: true,
            existing_method: None,
        }
    }

    fn duplicate(existing_method: Option<CheckInMethod>) -> Self {
        Self {
            success: false,
            is_new_check_in: false,
            existing_method,
        }
    }
}

/// Eligible population split by presence; `present + absent == total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub total: usize,
}

/// Present record joined with the participant's display name
#[derive(Debug, Clone)]
pub struct PresentParticipant {
    pub record: AttendanceRecord,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAttendance {
    pub checked_in_at: DateTime<Utc>,
    pub method: CheckInMethod,
}

/// `participant_id -> date -> check-in`
pub type AttendanceByDate = BTreeMap<String, BTreeMap<CivilDate, DayAttendance>>;

/// Attendance ledger service
pub struct AttendanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttendanceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Filter with its date defaulted to today
    fn dated(&self, filter: &AttendanceQuery) -> AttendanceQuery {
        AttendanceQuery {
            date: Some(filter.date.unwrap_or_else(|| self.ctx.today())),
            ..filter.clone()
        }
    }

    #[instrument(skip(self))]
    pub async fn find_check_in(
        &self,
        participant_id: &str,
        date: Option<CivilDate>,
    ) -> ServiceResult<CheckInLookup> {
        let date = date.unwrap_or_else(|| self.ctx.today());
        let record = self.ctx.attendance_repo().find(participant_id, date).await?;
        Ok(CheckInLookup {
            exists: record.is_some(),
            method: record.map(|r| r.method),
        })
    }

    /// Record today's check-in unless one exists
    #[instrument(skip(self), fields(date))]
    pub async fn check_in(
        &self,
        participant_id: &str,
        unit_id: Option<String>,
        attribute: Attribute,
        method: CheckInMethod,
    ) -> ServiceResult<CheckInResult> {
        let now = self.ctx.clock().now();
        let date = self.ctx.calendar().date_of(now);
        tracing::Span::current().record("date", tracing::field::display(date));

        let existing = self.find_check_in(participant_id, Some(date)).await?;
        if existing.exists {
            debug!(participant_id, "Check-in already recorded");
            return Ok(CheckInResult::duplicate(existing.method));
        }

        let record = AttendanceRecord::new(participant_id, date, now, unit_id, attribute, method);
        match self.ctx.attendance_repo().insert(&record).await {
            Ok(()) => {
                info!(participant_id, method = %method, "Check-in recorded");
                Ok(CheckInResult::created())
            }
            Err(DomainError::AlreadyCheckedIn(_)) => {
                // Lost the race against a concurrent insert
                let existing = self.find_check_in(participant_id, Some(date)).await?;
                debug!(participant_id, "Check-in rejected by unique key");
                Ok(CheckInResult::duplicate(existing.method))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn count_attendance(&self, filter: &AttendanceQuery) -> ServiceResult<i64> {
        Ok(self.ctx.attendance_repo().count(&self.dated(filter)).await?)
    }

    /// Present, absent and total over the eligible population for a date.
    ///
    /// Presence is any record on the date, whichever unit it was attributed
    /// to, so the counts agree with [`Self::absent_participant_ids`].
    #[instrument(skip(self))]
    pub async fn attendance_summary(
        &self,
        filter: &AttendanceQuery,
    ) -> ServiceResult<AttendanceSummary> {
        let eligible = self.eligible_ids(filter).await?;
        let absent = self.absent_among(&eligible, filter).await?.len();

        Ok(AttendanceSummary {
            present: eligible.len() - absent,
            absent,
            total: eligible.len(),
        })
    }

    #[instrument(skip(self))]
    pub async fn present_participants(
        &self,
        filter: &AttendanceQuery,
    ) -> ServiceResult<Vec<PresentParticipant>> {
        let records = self.ctx.attendance_repo().find_all(&self.dated(filter)).await?;

        let mut present = Vec::with_capacity(records.len());
        for record in records {
            let display_name = self
                .ctx
                .participant_repo()
                .find_by_id(&record.participant_id)
                .await?
                .and_then(|p| p.display_name);
            present.push(PresentParticipant {
                record,
                display_name,
            });
        }
        Ok(present)
    }

    /// Eligible participants without a record on the date
    #[instrument(skip(self))]
    pub async fn absent_participant_ids(
        &self,
        filter: &AttendanceQuery,
    ) -> ServiceResult<Vec<String>> {
        let eligible = self.eligible_ids(filter).await?;
        self.absent_among(&eligible, filter).await
    }

    /// Target members of the filtered units, or every participant when no
    /// unit is given. Deduplicated in first-seen order.
    async fn eligible_ids(&self, filter: &AttendanceQuery) -> ServiceResult<Vec<String>> {
        let ids = if filter.unit_ids.is_empty() {
            self.ctx.participant_repo().list_ids(filter.attribute).await?
        } else {
            self.ctx
                .membership_repo()
                .find_target_members(&member_query(filter))
                .await?
                .into_iter()
                .map(|m| m.participant_id)
                .collect()
        };

        let mut seen = HashSet::new();
        Ok(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
    }

    /// `eligible` minus everyone with a record on the filter's date
    async fn absent_among(
        &self,
        eligible: &[String],
        filter: &AttendanceQuery,
    ) -> ServiceResult<Vec<String>> {
        let present: HashSet<String> = self
            .ctx
            .attendance_repo()
            .find_all(&AttendanceQuery {
                date: self.dated(filter).date,
                ..AttendanceQuery::default()
            })
            .await?
            .into_iter()
            .map(|r| r.participant_id)
            .collect();

        Ok(eligible
            .iter()
            .filter(|id| !present.contains(*id))
            .cloned()
            .collect())
    }

    /// Check-ins between `start` and `end` inclusive, grouped by participant
    #[instrument(skip(self))]
    pub async fn attendance_by_date_range(
        &self,
        start: CivilDate,
        end: CivilDate,
        filter: &AttendanceQuery,
    ) -> ServiceResult<AttendanceByDate> {
        let span = end.as_naive().signed_duration_since(start.as_naive()).num_days();
        if span < 0 || span >= MAX_RANGE_DAYS {
            return Err(DomainError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }

        let query = AttendanceQuery {
            date: None,
            ..filter.clone()
        };
        let records = self.ctx.attendance_repo().find_range(start, end, &query).await?;

        let mut by_participant = AttendanceByDate::new();
        for record in records {
            by_participant
                .entry(record.participant_id)
                .or_default()
                .insert(
                    record.check_in_date,
                    DayAttendance {
                        checked_in_at: record.checked_in_at,
                        method: record.method,
                    },
                );
        }
        Ok(by_participant)
    }
}

fn member_query(filter: &AttendanceQuery) -> MemberQuery {
    MemberQuery {
        unit_ids: filter.unit_ids.clone(),
        attribute: filter.attribute,
    }
}
