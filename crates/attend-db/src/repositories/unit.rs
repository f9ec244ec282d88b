//! PostgreSQL implementation of UnitRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::entities::Unit;
use attend_core::traits::{RepoResult, UnitRepository};

use crate::models::UnitModel;

use super::error::map_db_error;

/// PostgreSQL implementation of UnitRepository
#[derive(Clone)]
pub struct PgUnitRepository {
    pool: PgPool,
}

impl PgUnitRepository {
    /// Create a new PgUnitRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitRepository for PgUnitRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Unit>> {
        let result = sqlx::query_as::<_, UnitModel>(
            r"
            SELECT id, name, icon_url, color, is_attendance_target, is_operations_unit, created_at, updated_at
            FROM units
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Unit::from))
    }

    #[instrument(skip(self, unit), fields(unit_id = %unit.id))]
    async fn upsert(&self, unit: &Unit) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO units (id, name, icon_url, color, is_attendance_target, is_operations_unit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                icon_url = EXCLUDED.icon_url,
                is_attendance_target = EXCLUDED.is_attendance_target,
                is_operations_unit = EXCLUDED.is_operations_unit,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(&unit.id)
        .bind(&unit.name)
        .bind(&unit.icon_url)
        .bind(&unit.color)
        .bind(unit.is_attendance_target)
        .bind(unit.is_operations_unit)
        .bind(unit.created_at)
        .bind(unit.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_targets(&self) -> RepoResult<Vec<Unit>> {
        let results = sqlx::query_as::<_, UnitModel>(
            r"
            SELECT id, name, icon_url, color, is_attendance_target, is_operations_unit, created_at, updated_at
            FROM units
            WHERE is_attendance_target
            ORDER BY name, id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Unit::from).collect())
    }
}
