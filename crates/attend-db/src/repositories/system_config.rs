//! PostgreSQL implementation of SystemConfigRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::traits::{RepoResult, SystemConfigRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of SystemConfigRepository
#[derive(Clone)]
pub struct PgSystemConfigRepository {
    pool: PgPool,
}

impl PgSystemConfigRepository {
    /// Create a new PgSystemConfigRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SystemConfigRepository for PgSystemConfigRepository {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM system_config WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> RepoResult<HashMap<String, String>> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM system_config")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().collect())
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO system_config (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSystemConfigRepository>();
    }
}
