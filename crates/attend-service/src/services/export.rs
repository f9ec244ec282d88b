//! Export service
//!
//! Reports for the spreadsheet integration, authorized by a shared API key.

use std::collections::HashMap;

use attend_core::traits::{AttendanceQuery, MemberQuery};
use attend_core::{Attribute, CivilDate, DomainError};
use attend_common::AppError;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use crate::dto::{
    ExportMember, ExportQuery, ExportResponse, ExportSummary, ExportUnit, RangeExportDay,
    RangeExportMember, RangeExportQuery, RangeExportResponse,
};

use super::attendance::AttendanceService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Export service
pub struct ExportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reject unless `provided` matches the configured key. With no key
    /// configured every request is rejected.
    pub fn authorize(&self, provided: Option<&str>) -> ServiceResult<()> {
        let Some(expected) = self.ctx.export_api_key() else {
            warn!("Export requested but no export API key is configured");
            return Err(AppError::InvalidApiKey.into());
        };
        match provided {
            Some(key) if bool::from(key.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
            _ => Err(AppError::InvalidApiKey.into()),
        }
    }

    /// Per-date report over attendance-target memberships
    #[instrument(skip(self, query), fields(date = ?query.date, guild_id = ?query.guild_id))]
    pub async fn report(&self, query: &ExportQuery) -> ServiceResult<ExportResponse> {
        self.authorize(query.api_key.as_deref())?;

        let date = match query.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => self.ctx.today(),
        };
        let attribute = query
            .attribute
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(parse_attribute)
            .transpose()?;
        let unit_ids: Vec<String> = query.guild_id.iter().filter(|g| !g.is_empty()).cloned().collect();

        let guilds = self.ctx.unit_repo().find_targets().await?;
        let unit_ids = if unit_ids.is_empty() {
            guilds.iter().map(|u| u.id.clone()).collect()
        } else {
            unit_ids
        };

        let attendance = AttendanceService::new(self.ctx);
        let day = AttendanceQuery::on(date);
        let records: HashMap<String, _> = attendance
            .present_participants(&day)
            .await?
            .into_iter()
            .map(|p| (p.record.participant_id.clone(), p.record))
            .collect();

        let members: Vec<ExportMember> = if unit_ids.is_empty() {
            Vec::new()
        } else {
            self.ctx
                .membership_repo()
                .find_target_members(&MemberQuery {
                    unit_ids: unit_ids.clone(),
                    attribute,
                })
                .await?
                .into_iter()
                .map(|m| {
                    let record = records.get(&m.participant_id);
                    ExportMember {
                        global_name: m.display_name.clone().unwrap_or_default(),
                        nickname: m.nickname.clone().unwrap_or_default(),
                        participant_id: m.participant_id,
                        guild_id: m.unit_id,
                        guild_name: m.unit_name,
                        attribute: m.attribute,
                        attended: record.is_some(),
                        check_in_timestamp: record.map(|r| r.checked_in_at),
                        check_in_method: record.map(|r| r.method),
                    }
                })
                .collect()
        };

        // No target units means nobody is eligible
        let summary = if unit_ids.is_empty() {
            ExportSummary::default()
        } else {
            attendance
                .attendance_summary(&AttendanceQuery {
                    date: Some(date),
                    attribute,
                    unit_ids,
                })
                .await?
                .into()
        };
        // Evaluated only when the event is enabled, as inside `info!`, but
        // awaited outside the macro so the future stays `Send`
        if tracing::enabled!(tracing::Level::INFO) {
            let check_ins = attendance.count_attendance(&day).await?;
            info!(
                total = summary.total,
                attended = summary.attended,
                check_ins,
                "Attendance export built"
            );
        }

        let guilds = guilds.iter().map(ExportUnit::from).collect();

        Ok(ExportResponse {
            date,
            members,
            guilds,
            summary,
        })
    }

    /// Attendance by date for every participant with a check-in in the range
    #[instrument(skip(self, query), fields(start = ?query.start, end = ?query.end))]
    pub async fn range(&self, query: &RangeExportQuery) -> ServiceResult<RangeExportResponse> {
        self.authorize(query.api_key.as_deref())?;

        let (Some(start), Some(end)) = (query.start.as_deref(), query.end.as_deref()) else {
            return Err(DomainError::ValidationError("start and end are required".to_string()).into());
        };
        let (start, end) = (parse_date(start)?, parse_date(end)?);

        let by_participant = AttendanceService::new(self.ctx)
            .attendance_by_date_range(start, end, &AttendanceQuery::default())
            .await?;

        let mut members = Vec::with_capacity(by_participant.len());
        for (participant_id, days) in by_participant {
            let global_name = self
                .ctx
                .participant_repo()
                .find_by_id(&participant_id)
                .await?
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| participant_id.clone());
            members.push(RangeExportMember {
                participant_id,
                global_name,
                attendance: days
                    .into_iter()
                    .map(|(date, day)| {
                        (
                            date,
                            RangeExportDay {
                                check_in_timestamp: day.checked_in_at,
                                method: day.method,
                            },
                        )
                    })
                    .collect(),
            });
        }

        Ok(RangeExportResponse {
            start,
            end,
            dates: dates_between(start, end),
            members,
        })
    }
}

fn parse_date(raw: &str) -> ServiceResult<CivilDate> {
    raw.parse::<CivilDate>()
        .map_err(|_| DomainError::InvalidDate(raw.to_string()).into())
}

fn parse_attribute(raw: &str) -> ServiceResult<Attribute> {
    raw.parse::<Attribute>()
        .map_err(|_| DomainError::ValidationError(format!("unknown attribute: {raw}")).into())
}

fn dates_between(start: CivilDate, end: CivilDate) -> Vec<CivilDate> {
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.succ();
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::context::testing::{fixture, Fixture, EXPORT_KEY};
    use attend_core::entities::{Participant, Unit, UnitMembership};
    use attend_core::CheckInMethod;

    async fn seed(fixture: &Fixture) {
        let ctx = &fixture.ctx;
        ctx.unit_repo().upsert(&Unit::new("g1", "Alpha")).await.unwrap();
        ctx.unit_repo().upsert(&Unit::new("g2", "Beta")).await.unwrap();
        ctx.unit_repo().upsert(&Unit::new("ops", "Ops").with_flags(false, true)).await.unwrap();
        for (id, unit) in [("p1", "g1"), ("p2", "g1"), ("p3", "g2"), ("p3", "ops")] {
            ctx.participant_repo()
                .upsert(&Participant::new(id, Some(format!("Name {id}")), None))
                .await
                .unwrap();
            ctx.membership_repo().upsert(&UnitMembership::new(id, unit)).await.unwrap();
        }
        AttendanceService::new(ctx)
            .check_in("p1", Some("g1".to_string()), Attribute::Participant, CheckInMethod::Scan)
            .await
            .unwrap();
    }

    fn query(key: Option<&str>) -> ExportQuery {
        ExportQuery {
            api_key: key.map(str::to_string),
            ..ExportQuery::default()
        }
    }

    #[tokio::test]
    async fn test_api_key_required() {
        let fixture = fixture();
        let service = ExportService::new(&fixture.ctx);

        let err = service.report(&query(None)).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_API_KEY");
        let err = service.report(&query(Some("wrong"))).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        let prefix = &EXPORT_KEY[..EXPORT_KEY.len() - 1];
        assert!(service.report(&query(Some(prefix))).await.is_err());
        assert!(service.report(&query(Some(EXPORT_KEY))).await.is_ok());
    }

    #[tokio::test]
    async fn test_report() {
        let fixture = fixture();
        seed(&fixture).await;
        let service = ExportService::new(&fixture.ctx);

        let report = service.report(&query(Some(EXPORT_KEY))).await.unwrap();
        assert_eq!(report.date.to_string(), "2026-03-01");
        assert_eq!(report.summary, ExportSummary { total: 3, attended: 1, absent: 2 });
        assert_eq!(report.guilds.len(), 2);

        let p1 = report.members.iter().find(|m| m.participant_id == "p1").unwrap();
        assert!(p1.attended);
        assert_eq!(p1.check_in_method, Some(CheckInMethod::Scan));

        let mut filtered = query(Some(EXPORT_KEY));
        filtered.guild_id = Some("g2".to_string());
        let report = service.report(&filtered).await.unwrap();
        assert_eq!(report.summary, ExportSummary { total: 1, attended: 0, absent: 1 });
    }

    #[tokio::test]
    async fn test_report_counts_operations_check_in() {
        let fixture = fixture();
        seed(&fixture).await;
        AttendanceService::new(&fixture.ctx)
            .check_in("p3", Some("ops".to_string()), Attribute::Staff, CheckInMethod::Manual)
            .await
            .unwrap();

        let mut filtered = query(Some(EXPORT_KEY));
        filtered.guild_id = Some("g2".to_string());
        let report = ExportService::new(&fixture.ctx).report(&filtered).await.unwrap();
        assert_eq!(report.summary, ExportSummary { total: 1, attended: 1, absent: 0 });
        assert!(report.members[0].attended);
    }

    #[tokio::test]
    async fn test_report_rejects_bad_input() {
        let fixture = fixture();
        let service = ExportService::new(&fixture.ctx);

        let mut bad_date = query(Some(EXPORT_KEY));
        bad_date.date = Some("2026-3-1".to_string());
        assert_eq!(service.report(&bad_date).await.unwrap_err().status_code(), 400);

        let mut bad_attribute = query(Some(EXPORT_KEY));
        bad_attribute.attribute = Some("guest".to_string());
        assert_eq!(service.report(&bad_attribute).await.unwrap_err().status_code(), 400);
    }

    #[tokio::test]
    async fn test_range() {
        let fixture = fixture();
        seed(&fixture).await;
        let service = ExportService::new(&fixture.ctx);

        let response = service
            .range(&RangeExportQuery {
                api_key: Some(EXPORT_KEY.to_string()),
                start: Some("2026-02-28".to_string()),
                end: Some("2026-03-02".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(response.dates.len(), 3);
        assert_eq!(response.members.len(), 1);
        assert_eq!(response.members[0].global_name, "Name p1");

        let err = service
            .range(&RangeExportQuery {
                api_key: Some(EXPORT_KEY.to_string()),
                start: Some("2026-03-02".to_string()),
                end: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
