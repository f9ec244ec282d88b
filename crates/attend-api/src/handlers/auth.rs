//! Session handlers

use attend_service::dto::SessionRequest;
use attend_service::LoginService;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use crate::extractors::{ValidatedJson, SESSION_COOKIE};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Store a session token issued by login completion in the `session` cookie
///
/// POST /api/auth/session
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SessionRequest>,
) -> ApiResult<(CookieJar, NoContent)> {
    let outcome = LoginService::new(state.service_context()).establish_session(&request.session_token)?;
    info!(participant_id = %outcome.participant_id, "Session cookie set");

    let cookie = session_cookie(outcome.session_token, outcome.max_age_seconds, state.secure_cookies());
    Ok((jar.add(cookie), NoContent))
}

/// Clear the session cookie
///
/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, NoContent) {
    if jar.get(SESSION_COOKIE).is_some() {
        info!("Session cleared");
    }
    (jar.remove(session_cookie_template(state.secure_cookies())), NoContent)
}

/// `session` cookie carrying `token` for `max_age_seconds`
pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie_template(secure);
    cookie.set_value(token);
    cookie.set_max_age(time::Duration::seconds(max_age_seconds));
    cookie
}

/// Attributes shared by every `session` cookie the server sets or clears
pub fn session_cookie_template(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}
