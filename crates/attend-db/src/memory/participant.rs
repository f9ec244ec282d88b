use async_trait::async_trait;
use chrono::Utc;

use attend_core::entities::Participant;
use attend_core::error::DomainError;
use attend_core::traits::{ParticipantRepository, RepoResult};
use attend_core::value_objects::Attribute;

use super::MemoryDatabase;

#[derive(Clone, Debug)]
pub struct MemoryParticipantRepository {
    db: MemoryDatabase,
}

impl MemoryParticipantRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParticipantRepository for MemoryParticipantRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Participant>> {
        Ok(self.db.tables.participants.get(id).map(|p| p.clone()))
    }

    async fn upsert(&self, participant: &Participant) -> RepoResult<()> {
        self.db
            .tables
            .participants
            .entry(participant.id.clone())
            .and_modify(|existing| {
                existing.display_name.clone_from(&participant.display_name);
                existing.avatar_url.clone_from(&participant.avatar_url);
                existing.updated_at = participant.updated_at;
            })
            .or_insert_with(|| participant.clone());
        Ok(())
    }

    async fn update_attribute(&self, id: &str, attribute: Attribute) -> RepoResult<()> {
        let mut entry = self
            .db
            .tables
            .participants
            .get_mut(id)
            .ok_or_else(|| DomainError::ParticipantNotFound(id.to_string()))?;
        entry.attribute = attribute;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn update_ticket(&self, id: &str, ticket_token: &str) -> RepoResult<()> {
        let mut entry = self
            .db
            .tables
            .participants
            .get_mut(id)
            .ok_or_else(|| DomainError::ParticipantNotFound(id.to_string()))?;
        entry.ticket_token = ticket_token.to_string();
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn list_ids(&self, attribute: Option<Attribute>) -> RepoResult<Vec<String>> {
        let mut rows: Vec<(chrono::DateTime<Utc>, String)> = self
            .db
            .tables
            .participants
            .iter()
            .filter(|p| attribute.map_or(true, |a| p.attribute == a))
            .map(|p| (p.created_at, p.id.clone()))
            .collect();
        rows.sort();
        Ok(rows.into_iter().map(|(_, id)| id).collect())
    }
}
