//! PostgreSQL implementation of AttendanceRepository
//!
//! The `(participant_id, check_in_date)` unique constraint decides races
//! between concurrent check-ins; a violation surfaces as `AlreadyCheckedIn`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::entities::AttendanceRecord;
use attend_core::error::DomainError;
use attend_core::traits::{AttendanceQuery, AttendanceRepository, RepoResult};
use attend_core::value_objects::CivilDate;

use crate::mappers::AttendanceInsert;
use crate::models::AttendanceModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of AttendanceRepository
#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    /// Create a new PgAttendanceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        participant_id: &str,
        date: CivilDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        let result = sqlx::query_as::<_, AttendanceModel>(
            r"
            SELECT participant_id, check_in_date, checked_in_at, unit_id, attribute, method
            FROM attendance_records
            WHERE participant_id = $1 AND check_in_date = $2
            ",
        )
        .bind(participant_id)
        .bind(date.as_naive())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AttendanceRecord::try_from).transpose()
    }

    #[instrument(skip(self, record), fields(participant_id = %record.participant_id, date = %record.check_in_date))]
    async fn insert(&self, record: &AttendanceRecord) -> RepoResult<()> {
        let insert = AttendanceInsert::new(record);

        sqlx::query(
            r"
            INSERT INTO attendance_records (participant_id, check_in_date, checked_in_at, unit_id, attribute, method)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&insert.participant_id)
        .bind(insert.check_in_date)
        .bind(insert.checked_in_at)
        .bind(&insert.unit_id)
        .bind(insert.attribute)
        .bind(insert.method)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::AlreadyCheckedIn(record.check_in_date.to_string()))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, query: &AttendanceQuery) -> RepoResult<Vec<AttendanceRecord>> {
        let results = sqlx::query_as::<_, AttendanceModel>(
            r"
            SELECT participant_id, check_in_date, checked_in_at, unit_id, attribute, method
            FROM attendance_records
            WHERE ($1::date IS NULL OR check_in_date = $1)
              AND ($2::text IS NULL OR attribute = $2)
              AND (cardinality($3::text[]) = 0 OR unit_id = ANY($3))
            ORDER BY checked_in_at
            ",
        )
        .bind(query.date.map(|d| d.as_naive()))
        .bind(query.attribute.map(|a| a.as_str()))
        .bind(&query.unit_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AttendanceRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &AttendanceQuery) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM attendance_records
            WHERE ($1::date IS NULL OR check_in_date = $1)
              AND ($2::text IS NULL OR attribute = $2)
              AND (cardinality($3::text[]) = 0 OR unit_id = ANY($3))
            ",
        )
        .bind(query.date.map(|d| d.as_naive()))
        .bind(query.attribute.map(|a| a.as_str()))
        .bind(&query.unit_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_range(
        &self,
        start: CivilDate,
        end: CivilDate,
        query: &AttendanceQuery,
    ) -> RepoResult<Vec<AttendanceRecord>> {
        let results = sqlx::query_as::<_, AttendanceModel>(
            r"
            SELECT participant_id, check_in_date, checked_in_at, unit_id, attribute, method
            FROM attendance_records
            WHERE check_in_date BETWEEN $1 AND $2
              AND ($3::text IS NULL OR attribute = $3)
              AND (cardinality($4::text[]) = 0 OR unit_id = ANY($4))
            ORDER BY check_in_date, checked_in_at
            ",
        )
        .bind(start.as_naive())
        .bind(end.as_naive())
        .bind(query.attribute.map(|a| a.as_str()))
        .bind(&query.unit_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AttendanceRecord::try_from).collect()
    }
}
