//! Participant attribute - the role class derived from group-role memberships

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role class of a participant.
///
/// Variants are ordered by priority so that `Staff > Organizer > Participant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    #[default]
    Participant,
    Organizer,
    Staff,
}

impl Attribute {
    /// All attributes in ascending priority
    pub const ALL: [Attribute; 3] = [Self::Participant, Self::Organizer, Self::Staff];

    /// Wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Organizer => "organizer",
            Self::Staff => "staff",
        }
    }

    #[inline]
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }

    #[inline]
    pub fn is_organizer(&self) -> bool {
        matches!(self, Self::Organizer)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an attribute string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute: {0}")]
pub struct AttributeParseError(pub String);

impl FromStr for Attribute {
    type Err = AttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "participant" => Ok(Self::Participant),
            "organizer" => Ok(Self::Organizer),
            "staff" => Ok(Self::Staff),
            other => Err(AttributeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Attribute::Staff > Attribute::Organizer);
        assert!(Attribute::Organizer > Attribute::Participant);
        assert_eq!(Attribute::ALL.iter().max(), Some(&Attribute::Staff));
    }

    #[test]
    fn test_parse() {
        assert_eq!("staff".parse::<Attribute>().unwrap(), Attribute::Staff);
        assert_eq!("organizer".parse::<Attribute>().unwrap(), Attribute::Organizer);
        assert!("admin".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Attribute::Organizer).unwrap();
        assert_eq!(json, "\"organizer\"");
        let back: Attribute = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(back, Attribute::Staff);
    }
}
