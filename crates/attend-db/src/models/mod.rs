//! Database models - SQLx-compatible structs for PostgreSQL tables

mod attendance;
mod membership;
mod participant;
mod role_mapping;
mod unit;

pub use attendance::AttendanceModel;
pub use membership::{MembershipInfoModel, TargetMemberModel};
pub use participant::ParticipantModel;
pub use role_mapping::RoleMappingModel;
pub use unit::UnitModel;
