//! Ticket tokens - the scannable credential held by each participant
//!
//! Wire format: `base64url(subject ":" issued_at_millis ":" nonce_hex) "." sig16`
//! where `sig16` is the first 16 lowercase hex chars of HMAC-SHA256(payload).
//! Tickets never expire.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use tracing::debug;

use super::legacy::LegacyWindow;
use super::{TokenFormat, VerifiedToken};
use crate::error::AppError;
use attend_core::entities::PLACEHOLDER_TICKET_PREFIX;

type HmacSha256 = Hmac<Sha256>;

const NONCE_BYTES: usize = 16;
const SIGNATURE_HEX_LEN: usize = 16;

/// Whether a stored ticket is a real signed credential.
///
/// Anything else (sync placeholders, legacy tickets) must be regenerated
/// before it is handed to a participant.
pub fn is_signed_ticket(token: &str) -> bool {
    token.contains('.') && !token.starts_with(PLACEHOLDER_TICKET_PREFIX)
}

/// Issues and verifies ticket tokens with the ticket secret
#[derive(Clone)]
pub struct TicketCodec {
    mac: HmacSha256,
    legacy: LegacyWindow,
}

impl TicketCodec {
    /// # Errors
    /// Returns `ConfigurationMissing` for an empty secret
    pub fn new(secret: &str, legacy: LegacyWindow) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::ConfigurationMissing("ticket secret".to_string()));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| AppError::ConfigurationMissing("ticket secret".to_string()))?;
        Ok(Self { mac, legacy })
    }

    pub fn issue(&self, subject_id: &str) -> String {
        self.issue_at(subject_id, Utc::now())
    }

    pub fn issue_at(&self, subject_id: &str, now: DateTime<Utc>) -> String {
        let mut nonce = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut nonce);

        let payload = format!("{subject_id}:{}:{}", now.timestamp_millis(), hex::encode(nonce));
        let signature = self.sign(&payload);
        format!("{}.{signature}", URL_SAFE_NO_PAD.encode(payload))
    }

    /// Verify a presented ticket. Never errors; any failure is `None`.
    pub fn verify(&self, token: &str) -> Option<VerifiedToken> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<VerifiedToken> {
        let verified = if token.contains('.') {
            self.verify_signed(token).map(|subject_id| VerifiedToken {
                subject_id,
                format: TokenFormat::Signed,
            })
        } else {
            self.legacy.decode(token, now).map(|subject_id| VerifiedToken {
                subject_id,
                format: TokenFormat::Legacy,
            })
        };

        if verified.is_none() {
            debug!(token_len = token.len(), "Ticket verification failed");
        }
        verified
    }

    fn verify_signed(&self, token: &str) -> Option<String> {
        let (encoded, signature) = token.split_once('.')?;
        if signature.len() != SIGNATURE_HEX_LEN
            || !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return None;
        }

        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded).ok()?).ok()?;

        let tag = hex::decode(signature).ok()?;
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_truncated_left(&tag).ok()?;

        let mut parts = payload.rsplitn(3, ':');
        let nonce = parts.next()?;
        let issued_at = parts.next()?;
        let subject_id = parts.next()?;

        if subject_id.is_empty()
            || issued_at.parse::<i64>().is_err()
            || nonce.len() != NONCE_BYTES * 2
            || hex::decode(nonce).is_err()
        {
            return None;
        }

        Some(subject_id.to_string())
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        digest[..SIGNATURE_HEX_LEN].to_string()
    }
}

impl std::fmt::Debug for TicketCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketCodec")
            .field("legacy", &self.legacy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::auth::legacy::encode_legacy;

    fn codec() -> TicketCodec {
        TicketCodec::new("test-qr-secret", LegacyWindow::closed()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let token = codec.issue("123");

        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified.subject_id, "123");
        assert_eq!(verified.format, TokenFormat::Signed);
        assert!(is_signed_ticket(&token));
    }

    #[test]
    fn test_wire_format() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue_at("123", now);

        let (encoded, signature) = token.split_once('.').unwrap();
        assert_eq!(signature.len(), 16);

        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded).unwrap()).unwrap();
        let parts: Vec<&str> = payload.split(':').collect();
        assert_eq!(parts[0], "123");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 32);
    }

    #[test]
    fn test_nonce_makes_tokens_unique() {
        let codec = codec();
        let now = Utc::now();
        assert_ne!(codec.issue_at("123", now), codec.issue_at("123", now));
    }

    #[test]
    fn test_signature_flip_rejected() {
        let codec = codec();
        let token = codec.issue("123");

        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        assert!(codec.verify(&tampered).is_none());
    }

    #[test]
    fn test_every_single_char_mutation_rejected() {
        let codec = codec();
        let token = codec.issue("123");

        for (i, original) in token.char_indices() {
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut mutated = token.clone();
            mutated.replace_range(i..=i, &replacement.to_string());
            assert!(codec.verify(&mutated).is_none(), "mutation at {i} accepted");
        }
    }

    #[test]
    fn test_uppercase_signature_rejected() {
        let codec = codec();
        let token = codec.issue("123");
        let (encoded, signature) = token.split_once('.').unwrap();
        let upper = format!("{encoded}.{}", signature.to_uppercase());
        if upper != token {
            assert!(codec.verify(&upper).is_none());
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec().issue("123");
        let other = TicketCodec::new("another-secret", LegacyWindow::closed()).unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_malformed_rejected() {
        let codec = codec();
        assert!(codec.verify("").is_none());
        assert!(codec.verify(".").is_none());
        assert!(codec.verify("abc.def").is_none());
        assert!(codec.verify("bot-sync-123-1700000000000").is_none());
    }

    #[test]
    fn test_legacy_ticket_gated_by_cutoff() {
        let now = Utc::now();
        let legacy = encode_legacy("123", (now + Duration::days(1)).timestamp_millis());

        assert!(codec().verify_at(&legacy, now).is_none());

        let open = TicketCodec::new("test-qr-secret", LegacyWindow::new(Some(now + Duration::days(7))))
            .unwrap();
        let verified = open.verify_at(&legacy, now).unwrap();
        assert_eq!(verified.subject_id, "123");
        assert_eq!(verified.format, TokenFormat::Legacy);

        let later = now + Duration::days(8);
        assert!(open.verify_at(&legacy, later).is_none());
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(!is_signed_ticket("bot-sync-123-1700000000000"));
        assert!(!is_signed_ticket("bot-sync-1.5"));
        assert!(!is_signed_ticket("eyJ1c2VySWQiOiIxMjMifQ"));
        assert!(is_signed_ticket("MTIzOjE3MDA.0123456789abcdef"));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        assert!(matches!(
            TicketCodec::new("", LegacyWindow::closed()),
            Err(AppError::ConfigurationMissing(_))
        ));
    }
}
