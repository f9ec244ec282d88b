//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs, plus inbound snapshots
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ExportQuery, IdentityProfile, ManualCheckInRequest, MemberSnapshot, RangeExportQuery,
    ScanRequest, SessionRequest, UnitSnapshot,
};

pub use responses::{
    CheckStatus, ExportMember, ExportResponse, ExportSummary, ExportUnit, HealthChecks,
    HealthResponse, RangeExportDay, RangeExportMember, RangeExportResponse, ReadinessResponse,
    ScanResponse, ScanStatus, ScanUnit, ScanUser, TicketResponse,
};
