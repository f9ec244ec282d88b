//! Participant entity <-> model mapper

use attend_core::entities::Participant;
use attend_core::error::DomainError;

use super::parse_attribute;
use crate::models::ParticipantModel;

impl TryFrom<ParticipantModel> for Participant {
    type Error = DomainError;

    fn try_from(model: ParticipantModel) -> Result<Self, Self::Error> {
        Ok(Participant {
            attribute: parse_attribute(&model.attribute)?,
            id: model.id,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            ticket_token: model.ticket_token,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
