//! PostgreSQL implementation of RoleMappingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::entities::RoleUnitMapping;
use attend_core::traits::{RepoResult, RoleMappingRepository};

use crate::models::RoleMappingModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoleMappingRepository
#[derive(Clone)]
pub struct PgRoleMappingRepository {
    pool: PgPool,
}

impl PgRoleMappingRepository {
    /// Create a new PgRoleMappingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleMappingRepository for PgRoleMappingRepository {
    #[instrument(skip(self))]
    async fn find_by_role(&self, role_id: &str) -> RepoResult<Option<RoleUnitMapping>> {
        let result = sqlx::query_as::<_, RoleMappingModel>(
            "SELECT role_id, target_unit_ids FROM role_unit_mappings WHERE role_id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RoleUnitMapping::from))
    }

    /// Mappings come back in the order of `role_ids`
    #[instrument(skip(self))]
    async fn find_by_roles(&self, role_ids: &[String]) -> RepoResult<Vec<RoleUnitMapping>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, RoleMappingModel>(
            r"
            SELECT r.role_id, r.target_unit_ids
            FROM unnest($1::text[]) WITH ORDINALITY AS wanted (role_id, ord)
            JOIN role_unit_mappings r ON r.role_id = wanted.role_id
            ORDER BY wanted.ord
            ",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(RoleUnitMapping::from).collect())
    }

    #[instrument(skip(self))]
    async fn upsert(&self, mapping: &RoleUnitMapping) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO role_unit_mappings (role_id, target_unit_ids, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (role_id) DO UPDATE
            SET target_unit_ids = EXCLUDED.target_unit_ids, updated_at = NOW()
            ",
        )
        .bind(&mapping.role_id)
        .bind(&mapping.target_unit_ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, role_id: &str) -> RepoResult<()> {
        sqlx::query("DELETE FROM role_unit_mappings WHERE role_id = $1")
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
