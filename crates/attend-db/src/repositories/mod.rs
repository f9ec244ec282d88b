//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in attend-core.
//! Each repository handles database operations for a specific domain entity.

mod attendance;
mod error;
mod membership;
mod participant;
mod role_mapping;
mod system_config;
mod unit;

pub use attendance::PgAttendanceRepository;
pub use membership::PgMembershipRepository;
pub use participant::PgParticipantRepository;
pub use role_mapping::PgRoleMappingRepository;
pub use system_config::PgSystemConfigRepository;
pub use unit::PgUnitRepository;
