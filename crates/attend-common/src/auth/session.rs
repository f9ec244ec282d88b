//! Session tokens for the participant-facing web surface
//!
//! New sessions are HS256 JWTs carrying the participant id and expiry.
//! Legacy unsigned sessions are still accepted during the migration window.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::legacy::LegacyWindow;
use super::{TokenFormat, VerifiedToken};
use crate::error::AppError;

/// Session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (participant id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Structural marker of the signed session format
fn is_jwt(token: &str) -> bool {
    token.contains('.') && token.starts_with("ey")
}

/// Issues and verifies session tokens with the session secret
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    max_age_seconds: i64,
    legacy: LegacyWindow,
}

impl SessionService {
    /// # Errors
    /// Returns `ConfigurationMissing` for an empty secret
    pub fn new(secret: &str, max_age_seconds: i64, legacy: LegacyWindow) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::ConfigurationMissing("session secret".to_string()));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            max_age_seconds,
            legacy,
        })
    }

    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    /// Issue a session token for a participant
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, subject_id: &str) -> Result<String, AppError> {
        self.issue_at(subject_id, Utc::now())
    }

    pub fn issue_at(&self, subject_id: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.max_age_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode session token")))
    }

    /// Verify a session token. Never errors; any failure is `None`.
    pub fn verify(&self, token: &str) -> Option<VerifiedToken> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<VerifiedToken> {
        if is_jwt(token) {
            return self.verify_jwt(token, now).map(|subject_id| VerifiedToken {
                subject_id,
                format: TokenFormat::Signed,
            });
        }

        self.legacy.decode(token, now).map(|subject_id| VerifiedToken {
            subject_id,
            format: TokenFormat::Legacy,
        })
    }

    fn verify_jwt(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `now` below
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "Session token rejected");
                return None;
            }
        };

        if claims.sub.is_empty() || now.timestamp() >= claims.exp {
            debug!("Session token expired");
            return None;
        }

        Some(claims.sub)
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("max_age_seconds", &self.max_age_seconds)
            .field("legacy", &self.legacy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::legacy::encode_legacy;

    fn service() -> SessionService {
        SessionService::new("test-session-secret", 604_800, LegacyWindow::closed()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let service = service();
        let token = service.issue("123").unwrap();
        assert!(token.starts_with("ey"));

        let verified = service.verify(&token).unwrap();
        assert_eq!(verified.subject_id, "123");
        assert_eq!(verified.format, TokenFormat::Signed);
    }

    #[test]
    fn test_expired_session_rejected() {
        let service = service();
        let issued = Utc::now() - Duration::days(8);
        let token = service.issue_at("123", issued).unwrap();
        assert!(service.verify(&token).is_none());

        let within = issued + Duration::days(6);
        assert!(service.verify_at(&token, within).is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue("123").unwrap();
        let other = SessionService::new("different", 604_800, LegacyWindow::closed()).unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_tampered_rejected() {
        let service = service();
        let token = service.issue("123").unwrap();
        let tampered = format!("{token}x");
        assert!(service.verify(&tampered).is_none());
        assert!(service.verify("invalid.token.here").is_none());
    }

    #[test]
    fn test_legacy_session_during_window() {
        let now = Utc::now();
        let legacy = encode_legacy("123", (now + Duration::days(1)).timestamp_millis());

        assert!(service().verify_at(&legacy, now).is_none());

        let open = SessionService::new(
            "test-session-secret",
            604_800,
            LegacyWindow::new(Some(now + Duration::days(30))),
        )
        .unwrap();
        let verified = open.verify_at(&legacy, now).unwrap();
        assert_eq!(verified.format, TokenFormat::Legacy);
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert!(matches!(
            SessionService::new("", 60, LegacyWindow::closed()),
            Err(AppError::ConfigurationMissing(_))
        ));
    }
}
