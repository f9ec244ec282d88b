//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{
    AttendanceRecord, MembershipInfo, Participant, RoleUnitMapping, TargetMember, Unit,
    UnitMembership,
};
use crate::error::DomainError;
use crate::value_objects::{Attribute, CivilDate};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find participant by external id
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Participant>>;

    /// Insert the participant or update its profile fields.
    ///
    /// An existing ticket and attribute are left untouched.
    async fn upsert(&self, participant: &Participant) -> RepoResult<()>;

    async fn update_attribute(&self, id: &str, attribute: Attribute) -> RepoResult<()>;

    async fn update_ticket(&self, id: &str, ticket_token: &str) -> RepoResult<()>;

    /// All participant ids, optionally restricted to one attribute
    async fn list_ids(&self, attribute: Option<Attribute>) -> RepoResult<Vec<String>>;
}

// ============================================================================
// Unit Repository
// ============================================================================

#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Unit>>;

    /// Insert the unit or refresh its name, icon and flags
    async fn upsert(&self, unit: &Unit) -> RepoResult<()>;

    /// Units flagged as attendance targets, ordered by name
    async fn find_targets(&self) -> RepoResult<Vec<Unit>>;
}

// ============================================================================
// Membership Repository
// ============================================================================

/// Filter for listing attendance-target memberships
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    /// Restrict to these units; empty means every target unit
    pub unit_ids: Vec<String>,
    pub attribute: Option<Attribute>,
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert or replace the membership snapshot
    async fn upsert(&self, membership: &UnitMembership) -> RepoResult<()>;

    /// Delete a membership, returning whether one existed
    async fn delete(&self, participant_id: &str, unit_id: &str) -> RepoResult<bool>;

    /// Memberships of a participant joined with unit flags.
    ///
    /// Ordered by first observation so resolution is order-stable.
    async fn find_by_participant(&self, participant_id: &str) -> RepoResult<Vec<MembershipInfo>>;

    /// Participants reachable through attendance-target memberships
    async fn find_target_members(&self, query: &MemberQuery) -> RepoResult<Vec<TargetMember>>;
}

// ============================================================================
// Attendance Repository
// ============================================================================

/// Filter for attendance aggregates
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    pub date: Option<CivilDate>,
    pub attribute: Option<Attribute>,
    /// Restrict to these attributed units; empty means any
    pub unit_ids: Vec<String>,
}

impl AttendanceQuery {
    pub fn on(date: CivilDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Whether a record passes the attribute and unit filters
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.date.map_or(true, |d| d == record.check_in_date)
            && self.attribute.map_or(true, |a| a == record.attribute)
            && (self.unit_ids.is_empty()
                || record
                    .unit_id
                    .as_ref()
                    .is_some_and(|u| self.unit_ids.contains(u)))
    }
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Record for one participant on one civil date
    async fn find(&self, participant_id: &str, date: CivilDate)
        -> RepoResult<Option<AttendanceRecord>>;

    /// Insert a new record.
    ///
    /// Fails with `DomainError::AlreadyCheckedIn` when `(participant_id, check_in_date)`
    /// already exists; this is the authoritative duplicate signal.
    async fn insert(&self, record: &AttendanceRecord) -> RepoResult<()>;

    /// Records matching the query, ordered by check-in time
    async fn find_all(&self, query: &AttendanceQuery) -> RepoResult<Vec<AttendanceRecord>>;

    async fn count(&self, query: &AttendanceQuery) -> RepoResult<i64>;

    /// Records with `start <= check_in_date <= end`, ordered by date then time
    async fn find_range(
        &self,
        start: CivilDate,
        end: CivilDate,
        query: &AttendanceQuery,
    ) -> RepoResult<Vec<AttendanceRecord>>;
}

// ============================================================================
// Role Mapping Repository
// ============================================================================

#[async_trait]
pub trait RoleMappingRepository: Send + Sync {
    async fn find_by_role(&self, role_id: &str) -> RepoResult<Option<RoleUnitMapping>>;

    async fn find_by_roles(&self, role_ids: &[String]) -> RepoResult<Vec<RoleUnitMapping>>;

    async fn upsert(&self, mapping: &RoleUnitMapping) -> RepoResult<()>;

    async fn delete(&self, role_id: &str) -> RepoResult<()>;
}

// ============================================================================
// System Config Repository
// ============================================================================

#[async_trait]
pub trait SystemConfigRepository: Send + Sync {
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    async fn get_all(&self) -> RepoResult<HashMap<String, String>>;

    async fn set(&self, key: &str, value: &str) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::value_objects::CheckInMethod;

    fn record(unit: Option<&str>, attribute: Attribute) -> AttendanceRecord {
        AttendanceRecord::new(
            "p1",
            CivilDate::from_ymd(2026, 3, 1).unwrap(),
            Utc::now(),
            unit.map(str::to_string),
            attribute,
            CheckInMethod::Scan,
        )
    }

    #[test]
    fn test_attendance_query_matches() {
        let query = AttendanceQuery::default();
        assert!(query.matches(&record(None, Attribute::Participant)));

        let query = AttendanceQuery {
            unit_ids: vec!["g1".to_string()],
            ..AttendanceQuery::default()
        };
        assert!(query.matches(&record(Some("g1"), Attribute::Participant)));
        assert!(!query.matches(&record(Some("g2"), Attribute::Participant)));
        assert!(!query.matches(&record(None, Attribute::Participant)));

        let query = AttendanceQuery {
            attribute: Some(Attribute::Staff),
            ..AttendanceQuery::default()
        };
        assert!(!query.matches(&record(None, Attribute::Participant)));
    }

    #[test]
    fn test_attendance_query_date() {
        let query = AttendanceQuery::on(CivilDate::from_ymd(2026, 3, 2).unwrap());
        assert!(!query.matches(&record(None, Attribute::Participant)));
    }
}
