//! Login completion
//!
//! Runs after the identity provider has returned a profile: upserts the
//! participant, makes sure a signed ticket exists and issues a session.

use attend_core::entities::Participant;
use tracing::{debug, info, instrument};

use crate::dto::IdentityProfile;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::ticket::TicketService;

/// Session issued at the end of a login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub participant_id: String,
    pub session_token: String,
    pub max_age_seconds: i64,
}

/// Login service
pub struct LoginService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoginService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, profile), fields(participant_id = %profile.id))]
    pub async fn complete_login(&self, profile: IdentityProfile) -> ServiceResult<LoginOutcome> {
        if profile.id.is_empty() {
            return Err(ServiceError::validation("identity profile has no id"));
        }

        let participant = match self.ctx.participant_repo().find_by_id(&profile.id).await? {
            Some(mut existing) => {
                existing.set_profile(Some(profile.display_name()), profile.avatar_url.clone());
                existing
            }
            None => Participant::new(
                &profile.id,
                Some(profile.display_name()),
                profile.avatar_url.clone(),
            ),
        };
        self.ctx.participant_repo().upsert(&participant).await?;
        TicketService::new(self.ctx).ensure_valid_ticket(&profile.id).await?;

        let session = self.ctx.session_service();
        let session_token = session.issue_at(&profile.id, self.ctx.clock().now())?;
        info!("Login completed");

        Ok(LoginOutcome {
            participant_id: profile.id,
            session_token,
            max_age_seconds: session.max_age_seconds(),
        })
    }

    /// Check a session token before it is stored in the browser
    #[instrument(skip_all)]
    pub fn establish_session(&self, session_token: &str) -> ServiceResult<LoginOutcome> {
        let participant_id = self.authenticate(session_token)?;
        Ok(LoginOutcome {
            participant_id,
            session_token: session_token.to_string(),
            max_age_seconds: self.ctx.session_service().max_age_seconds(),
        })
    }

    /// Subject of a session token; any failure is a bare `InvalidToken`
    #[instrument(skip_all)]
    pub fn authenticate(&self, session_token: &str) -> ServiceResult<String> {
        match self
            .ctx
            .session_service()
            .verify_at(session_token, self.ctx.clock().now())
        {
            Some(verified) => Ok(verified.subject_id),
            None => {
                debug!("Session token rejected");
                Err(ServiceError::invalid_token())
            }
        }
    }
}
