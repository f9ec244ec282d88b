//! Entity to model mappers
//!
//! Conversions between domain entities (attend-core) and database models.
//! Text columns holding enums are parsed with `TryFrom`; an unknown value is a
//! database error rather than a silent default.

mod attendance;
mod membership;
mod participant;
mod unit;

pub use attendance::AttendanceInsert;

use attend_core::error::DomainError;
use attend_core::value_objects::Attribute;

fn parse_attribute(raw: &str) -> Result<Attribute, DomainError> {
    raw.parse()
        .map_err(|e: attend_core::value_objects::AttributeParseError| {
            DomainError::DatabaseError(e.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute() {
        assert_eq!(parse_attribute("staff").unwrap(), Attribute::Staff);
        assert!(matches!(
            parse_attribute("root"),
            Err(DomainError::DatabaseError(_))
        ));
    }
}
