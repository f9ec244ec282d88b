//! Business logic services
//!
//! This module contains the service layer implementations that orchestrate
//! the resolvers, the ledger and the repositories.

pub mod attendance;
pub mod check_in;
pub mod context;
pub mod error;
pub mod export;
pub mod login;
pub mod permission;
pub mod sync;
pub mod ticket;

// Re-export all services for convenience
pub use attendance::{
    AttendanceByDate, AttendanceService, AttendanceSummary, CheckInLookup, CheckInResult,
    DayAttendance, PresentParticipant,
};
pub use check_in::CheckInService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use export::ExportService;
pub use login::{LoginOutcome, LoginService};
pub use permission::{PermissionService, UnitScope};
pub use sync::SyncService;
pub use ticket::TicketService;
