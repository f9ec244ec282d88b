//! Role-id list encodings
//!
//! Membership snapshots store role ids as a JSON array string; configuration
//! values store them comma-separated.

/// Decode a JSON array of role ids. Malformed data yields an empty list.
pub fn parse_role_ids(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

/// Encode role ids as a JSON array string
pub fn encode_role_ids(role_ids: &[String]) -> String {
    serde_json::to_string(role_ids).unwrap_or_else(|_| "[]".to_string())
}

/// Split a comma-separated id list, trimming whitespace and dropping blanks
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
