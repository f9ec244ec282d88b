//! # attend-service
//!
//! Application layer containing the check-in pipeline, membership sync,
//! ticket and login flows, permission checks, export reports and their DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AttendanceService, CheckInService, ExportService, LoginService, PermissionService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SyncService,
    TicketService,
};
