//! Request DTOs for API endpoints and inbound snapshots
//!
//! HTTP request bodies implement `Deserialize` and `Validate`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Check-in Requests
// ============================================================================

/// Ticket presented at a check-in point
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ScanRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Staff entering a participant by hand
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ManualCheckInRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "participant_id is required"))]
    pub participant_id: String,
}

// ============================================================================
// Session Requests
// ============================================================================

/// Session token handed to the browser at the end of a login
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SessionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "session_token is required"))]
    pub session_token: String,
}

// ============================================================================
// Export Queries
// ============================================================================

/// Query string of `GET /api/attendance-export`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub api_key: Option<String>,
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
    pub guild_id: Option<String>,
    pub attribute: Option<String>,
}

/// Query string of `GET /api/attendance-export/range`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeExportQuery {
    pub api_key: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

// ============================================================================
// Snapshots from the identity provider
// ============================================================================

/// Unit as observed by the membership source
#[derive(Debug, Clone, Deserialize)]
pub struct UnitSnapshot {
    pub unit_id: String,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// One member of a unit as observed by the membership source
#[derive(Debug, Clone, Deserialize)]
pub struct MemberSnapshot {
    pub participant_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub is_bot: bool,
}

/// Profile returned by the identity provider after the OAuth exchange
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl IdentityProfile {
    /// Global name, then username
    pub fn display_name(&self) -> String {
        self.global_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_requires_token() {
        let request: ScanRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());

        let request: ScanRequest = serde_json::from_str(r#"{"token":"abc.def"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_export_query_camel_case() {
        let query: ExportQuery =
            serde_json::from_str(r#"{"apiKey":"k","guildId":"g1","date":"2026-03-01"}"#).unwrap();
        assert_eq!(query.api_key.as_deref(), Some("k"));
        assert_eq!(query.guild_id.as_deref(), Some("g1"));
        assert!(query.attribute.is_none());
    }

    #[test]
    fn test_profile_display_name() {
        let mut profile = IdentityProfile {
            id: "1".to_string(),
            username: "user".to_string(),
            global_name: Some("Global".to_string()),
            avatar_url: None,
        };
        assert_eq!(profile.display_name(), "Global");
        profile.global_name = Some(String::new());
        assert_eq!(profile.display_name(), "user");
    }
}
