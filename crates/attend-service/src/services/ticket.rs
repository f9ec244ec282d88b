//! Ticket service
//!
//! Hands out the scannable ticket, replacing sync placeholders first.

use attend_common::is_signed_ticket;
use tracing::{info, instrument};

use crate::dto::TicketResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Ticket service
pub struct TicketService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TicketService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Signed ticket for the participant, regenerating and persisting it when
    /// the stored value is a placeholder or legacy ticket
    #[instrument(skip(self))]
    pub async fn ensure_valid_ticket(&self, participant_id: &str) -> ServiceResult<String> {
        let participant = self
            .ctx
            .participant_repo()
            .find_by_id(participant_id)
            .await?
            .ok_or_else(ServiceError::unknown_participant)?;

        if is_signed_ticket(&participant.ticket_token) {
            return Ok(participant.ticket_token);
        }

        let ticket = self
            .ctx
            .ticket_codec()
            .issue_at(participant_id, self.ctx.clock().now());
        self.ctx
            .participant_repo()
            .update_ticket(participant_id, &ticket)
            .await?;
        info!("Placeholder ticket replaced");
        Ok(ticket)
    }

    /// Ticket payload for `GET /api/tickets/@me`
    #[instrument(skip(self))]
    pub async fn my_ticket(&self, participant_id: &str) -> ServiceResult<TicketResponse> {
        let ticket_token = self.ensure_valid_ticket(participant_id).await?;
        let participant = self
            .ctx
            .participant_repo()
            .find_by_id(participant_id)
            .await?
            .ok_or_else(ServiceError::unknown_participant)?;

        Ok(TicketResponse {
            ticket_token,
            ..TicketResponse::from(&participant)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attend_core::entities::Participant;
    use crate::services::context::testing::fixture;

    #[tokio::test]
    async fn test_placeholder_regenerated_once() {
        let fixture = fixture();
        let ctx = &fixture.ctx;
        ctx.participant_repo().upsert(&Participant::new("123", None, None)).await.unwrap();
        let service = TicketService::new(ctx);

        let ticket = service.ensure_valid_ticket("123").await.unwrap();
        assert!(is_signed_ticket(&ticket));
        let verified = ctx.ticket_codec().verify(&ticket).unwrap();
        assert_eq!(verified.subject_id, "123");

        let again = service.ensure_valid_ticket("123").await.unwrap();
        assert_eq!(again, ticket);

        let stored = ctx.participant_repo().find_by_id("123").await.unwrap().unwrap();
        assert_eq!(stored.ticket_token, ticket);
    }

    #[tokio::test]
    async fn test_unknown_participant() {
        let fixture = fixture();
        let err = TicketService::new(&fixture.ctx)
            .ensure_valid_ticket("nobody")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARTICIPANT");
    }

    #[tokio::test]
    async fn test_my_ticket() {
        let fixture = fixture();
        let ctx = &fixture.ctx;
        ctx.participant_repo()
            .upsert(&Participant::new("123", Some("Alice".to_string()), None))
            .await
            .unwrap();

        let response = TicketService::new(ctx).my_ticket("123").await.unwrap();
        assert_eq!(response.display_name.as_deref(), Some("Alice"));
        assert!(is_signed_ticket(&response.ticket_token));
    }
}
