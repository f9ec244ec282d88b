//! Participant entity - a person attending the event

use chrono::{DateTime, Utc};

use crate::value_objects::Attribute;

/// Prefix of tickets written by sync before a signed ticket exists
pub const PLACEHOLDER_TICKET_PREFIX: &str = "bot-sync-";

/// Participant entity keyed by the external identity id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub attribute: Attribute,
    pub ticket_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant on first sighting, holding a placeholder ticket
    pub fn new(id: impl Into<String>, display_name: Option<String>, avatar_url: Option<String>) -> Self {
        let id = id.into();
        let now = Utc::now();
        Self {
            ticket_token: placeholder_ticket(&id, now),
            id,
            display_name,
            avatar_url,
            attribute: Attribute::Participant,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name with the external id as fallback
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    pub fn set_attribute(&mut self, attribute: Attribute) {
        if self.attribute != attribute {
            self.attribute = attribute;
            self.updated_at = Utc::now();
        }
    }

    pub fn set_profile(&mut self, display_name: Option<String>, avatar_url: Option<String>) {
        self.display_name = display_name;
        self.avatar_url = avatar_url;
        self.updated_at = Utc::now();
    }

    pub fn set_ticket(&mut self, ticket_token: String) {
        self.ticket_token = ticket_token;
        self.updated_at = Utc::now();
    }
}

/// Placeholder ticket value for a participant seen at `at`
pub fn placeholder_ticket(participant_id: &str, at: DateTime<Utc>) -> String {
    format!("{PLACEHOLDER_TICKET_PREFIX}{participant_id}-{}", at.timestamp_millis())
}
