//! Session cookie extractor
//!
//! Reads the `session` cookie and resolves it to a participant id.

use attend_common::AppError;
use attend_service::LoginService;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use crate::response::ApiError;
use crate::state::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Participant authenticated by the session cookie
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub participant_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::App(AppError::MissingAuth))?;

        let app_state = AppState::from_ref(state);
        let participant_id = LoginService::new(app_state.service_context()).authenticate(&token)?;

        Ok(Self { participant_id })
    }
}
