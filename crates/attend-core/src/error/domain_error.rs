//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: {start} to {end}")]
    InvalidDateRange { start: String, end: String },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    /// A check-in already exists for the participant on that civil date
    #[error("Already checked in on {0}")]
    AlreadyCheckedIn(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParticipantNotFound(_) => "UNKNOWN_PARTICIPANT",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",

            Self::AlreadyCheckedIn(_) => "ALREADY_CHECKED_IN",

            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ParticipantNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidDate(_) | Self::InvalidDateRange { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyCheckedIn(_))
    }
}
