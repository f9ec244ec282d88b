//! Attendance export handlers
//!
//! Read models for the spreadsheet sync, authorized by `apiKey`.

use attend_service::dto::{ExportQuery, ExportResponse, RangeExportQuery, RangeExportResponse};
use attend_service::ExportService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Per-date report
///
/// GET /api/attendance-export?apiKey&date&guildId&attribute
pub async fn attendance_export(
    State(state): State<AppState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<Json<ExportResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let report = ExportService::new(state.service_context()).report(&query).await?;
    Ok(Json(report))
}

/// Attendance by date over an inclusive range
///
/// GET /api/attendance-export/range?apiKey&start&end
pub async fn attendance_export_range(
    State(state): State<AppState>,
    query: Result<Query<RangeExportQuery>, QueryRejection>,
) -> ApiResult<Json<RangeExportResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let report = ExportService::new(state.service_context()).range(&query).await?;
    Ok(Json(report))
}
