//! Legacy unsigned token decoder
//!
//! Early deployments issued `base64url(json{userId, exp})` with `exp` in epoch
//! milliseconds and no signature. These are accepted only while the migration
//! window is open. Remove this module once `LEGACY_TOKEN_CUTOFF` has passed in
//! every deployment.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// URL-safe alphabet, padding optional
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Deserialize)]
struct LegacyPayload {
    #[serde(rename = "userId")]
    user_id: String,
    exp: i64,
}

/// Migration window for legacy tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyWindow {
    cutoff: Option<DateTime<Utc>>,
}

impl LegacyWindow {
    /// `None` keeps the window closed
    pub fn new(cutoff: Option<DateTime<Utc>>) -> Self {
        Self { cutoff }
    }

    pub fn closed() -> Self {
        Self { cutoff: None }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.cutoff.is_some_and(|cutoff| now < cutoff)
    }

    /// Subject of a well-formed, unexpired legacy token while the window is open
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        if !self.is_open(now) {
            return None;
        }

        let bytes = LENIENT_URL_SAFE.decode(token).ok()?;
        let payload: LegacyPayload = serde_json::from_slice(&bytes).ok()?;

        if payload.user_id.is_empty() || now.timestamp_millis() > payload.exp {
            debug!("Legacy token rejected");
            return None;
        }

        Some(payload.user_id)
    }
}

#[cfg(test)]
pub(crate) fn encode_legacy(user_id: &str, exp_millis: i64) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let json = serde_json::json!({ "userId": user_id, "exp": exp_millis });
    URL_SAFE_NO_PAD.encode(json.to_string())
}
