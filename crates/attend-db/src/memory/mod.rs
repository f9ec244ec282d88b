//! In-memory repository implementations
//!
//! Backs the server when no `DATABASE_URL` is configured and drives the
//! end-to-end tests. All repositories created from one [`MemoryDatabase`]
//! share the same tables.

mod attendance;
mod catalog;
mod membership;
mod participant;

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use attend_core::entities::{
    AttendanceRecord, Participant, RoleUnitMapping, Unit, UnitMembership,
};
use attend_core::value_objects::CivilDate;

pub use attendance::MemoryAttendanceRepository;
pub use catalog::{MemoryRoleMappingRepository, MemorySystemConfigRepository, MemoryUnitRepository};
pub use membership::MemoryMembershipRepository;
pub use participant::MemoryParticipantRepository;

#[derive(Default)]
struct Tables {
    participants: DashMap<String, Participant>,
    units: DashMap<String, Unit>,
    /// Insertion order is first-observation order
    memberships: RwLock<Vec<UnitMembership>>,
    /// Keyed by `(participant_id, check_in_date)`; the entry API is the uniqueness guard
    attendance: DashMap<(String, CivilDate), AttendanceRecord>,
    role_mappings: DashMap<String, RoleUnitMapping>,
    config: RwLock<HashMap<String, String>>,
}

/// Shared in-memory tables
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatabase")
            .field("participants", &self.tables.participants.len())
            .field("units", &self.tables.units.len())
            .field("attendance", &self.tables.attendance.len())
            .finish_non_exhaustive()
    }
}
