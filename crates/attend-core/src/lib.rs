//! # attend-core
//!
//! Domain layer containing entities, value objects, repository traits and the
//! pure attribute / primary-unit resolvers.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod resolver;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AttendanceRecord, MembershipInfo, Participant, RoleUnitMapping, TargetMember, Unit,
    UnitMembership,
};
pub use error::DomainError;
pub use resolver::{
    determine_attribute, resolve_primary_unit, PermissionLevel, PrimaryUnit, ResolverSettings,
};
pub use traits::{
    AttendanceQuery, AttendanceRepository, MemberQuery, MembershipRepository,
    ParticipantRepository, RepoResult, RoleMappingRepository, SystemConfigRepository,
    UnitRepository,
};
pub use value_objects::{Attribute, CheckInMethod, CivilCalendar, CivilDate, Clock, SystemClock};
