//! Participant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for participants table
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub attribute: String,
    pub ticket_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
