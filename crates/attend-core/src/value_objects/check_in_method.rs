//! Check-in method provenance

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a check-in was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInMethod {
    /// Ticket scanned at a check-in point
    #[default]
    Scan,
    /// Entered by staff by hand
    Manual,
}

impl CheckInMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Manual => "manual",
        }
    }

    /// Decode a stored method. Rows written before the column existed carry
    /// no value and are treated as scans.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("manual") => Self::Manual,
            _ => Self::Scan,
        }
    }
}

impl fmt::Display for CheckInMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
