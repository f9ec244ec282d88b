//! PostgreSQL implementation of ParticipantRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use attend_core::entities::Participant;
use attend_core::traits::{ParticipantRepository, RepoResult};
use attend_core::value_objects::Attribute;

use crate::models::ParticipantModel;

use super::error::{map_db_error, participant_not_found};

/// PostgreSQL implementation of ParticipantRepository
#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    /// Create a new PgParticipantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT id, display_name, avatar_url, attribute, ticket_token, created_at, updated_at
            FROM participants
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Participant::try_from).transpose()
    }

    #[instrument(skip(self, participant), fields(participant_id = %participant.id))]
    async fn upsert(&self, participant: &Participant) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO participants (id, display_name, avatar_url, attribute, ticket_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(&participant.id)
        .bind(&participant.display_name)
        .bind(&participant.avatar_url)
        .bind(participant.attribute.as_str())
        .bind(&participant.ticket_token)
        .bind(participant.created_at)
        .bind(participant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_attribute(&self, id: &str, attribute: Attribute) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE participants
            SET attribute = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(attribute.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(participant_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self, ticket_token))]
    async fn update_ticket(&self, id: &str, ticket_token: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE participants
            SET ticket_token = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(ticket_token)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(participant_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_ids(&self, attribute: Option<Attribute>) -> RepoResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT id FROM participants
            WHERE ($1::text IS NULL OR attribute = $1)
            ORDER BY created_at, id
            ",
        )
        .bind(attribute.map(|a| a.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
