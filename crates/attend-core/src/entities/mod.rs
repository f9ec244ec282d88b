//! Domain entities - core business objects

mod attendance;
mod membership;
mod participant;
mod role_mapping;
mod unit;

pub use attendance::AttendanceRecord;
pub use membership::{MembershipInfo, TargetMember, UnitMembership};
pub use participant::{placeholder_ticket, Participant, PLACEHOLDER_TICKET_PREFIX};
pub use role_mapping::RoleUnitMapping;
pub use unit::{default_color, Unit};
