//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::entities::{MembershipInfo, TargetMember, UnitMembership};
use attend_core::traits::{MemberQuery, MembershipRepository, RepoResult};

use crate::models::{MembershipInfoModel, TargetMemberModel};

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self, membership), fields(participant_id = %membership.participant_id, unit_id = %membership.unit_id))]
    async fn upsert(&self, membership: &UnitMembership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO unit_memberships (participant_id, unit_id, nickname, avatar_url, role_ids, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (participant_id, unit_id) DO UPDATE
            SET nickname = EXCLUDED.nickname,
                avatar_url = EXCLUDED.avatar_url,
                role_ids = EXCLUDED.role_ids,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(&membership.participant_id)
        .bind(&membership.unit_id)
        .bind(&membership.nickname)
        .bind(&membership.avatar_url)
        .bind(&membership.role_ids)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, participant_id: &str, unit_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM unit_memberships
            WHERE participant_id = $1 AND unit_id = $2
            ",
        )
        .bind(participant_id)
        .bind(unit_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_participant(&self, participant_id: &str) -> RepoResult<Vec<MembershipInfo>> {
        let results = sqlx::query_as::<_, MembershipInfoModel>(
            r"
            SELECT u.id AS unit_id, u.name AS unit_name, u.is_attendance_target, u.is_operations_unit,
                   m.nickname, m.role_ids
            FROM unit_memberships m
            JOIN units u ON u.id = m.unit_id
            WHERE m.participant_id = $1
            ORDER BY m.seq
            ",
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MembershipInfo::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_target_members(&self, query: &MemberQuery) -> RepoResult<Vec<TargetMember>> {
        let results = sqlx::query_as::<_, TargetMemberModel>(
            r"
            SELECT m.participant_id, p.display_name, m.nickname, p.attribute,
                   u.id AS unit_id, u.name AS unit_name
            FROM unit_memberships m
            JOIN units u ON u.id = m.unit_id
            JOIN participants p ON p.id = m.participant_id
            WHERE u.is_attendance_target
              AND (cardinality($1::text[]) = 0 OR m.unit_id = ANY($1))
              AND ($2::text IS NULL OR p.attribute = $2)
            ORDER BY u.name, m.seq
            ",
        )
        .bind(&query.unit_ids)
        .bind(query.attribute.map(|a| a.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(TargetMember::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMembershipRepository>();
    }
}
