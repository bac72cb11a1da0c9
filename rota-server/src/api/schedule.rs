//! Schedule API Handlers
//!
//! Assignment grid access and the guarded clear/restore endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rota_core::domain::assignment::AssignmentGrid;
use rota_core::domain::backup::BackupSummary;
use rota_core::dto::schedule::{
    ClearOutcome, ClearSchedule, RestoreOutcome, UpdateAssignment, UpdateOutcome, YearQuery,
};

use crate::api::error::ApiResult;
use crate::service::schedule_service;
use crate::state::AppState;

// =============================================================================
// Bulk Mutation Endpoints
// =============================================================================

/// POST /api/schedule/clear
pub async fn clear_schedule(
    State(state): State<AppState>,
    Json(req): Json<ClearSchedule>,
) -> ApiResult<Json<ClearOutcome>> {
    tracing::info!(
        "Clear requested for year {} (resident: {:?})",
        req.year_id,
        req.resident_id
    );

    let outcome = schedule_service::clear(&state.pool, &state.locks, req).await?;

    Ok(Json(outcome))
}

/// GET /api/schedule/backups?year_id=
pub async fn list_backups(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<BackupSummary>>> {
    let backups = schedule_service::list_backups(&state.pool, query.year_id).await?;
    Ok(Json(backups))
}

/// POST /api/schedule/restore/{backup_id}
pub async fn restore_backup(
    State(state): State<AppState>,
    Path(backup_id): Path<i64>,
) -> ApiResult<Json<RestoreOutcome>> {
    tracing::info!("Restore requested for backup {}", backup_id);

    let outcome = schedule_service::restore(&state.pool, &state.locks, backup_id).await?;

    Ok(Json(outcome))
}

// =============================================================================
// Cell Endpoints
// =============================================================================

/// GET /api/schedule/assignments?year_id=
pub async fn get_assignments(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<AssignmentGrid>> {
    let grid = schedule_service::get_assignments(&state.pool, query.year_id).await?;
    Ok(Json(grid))
}

/// PUT /api/schedule/assignment
pub async fn update_assignment(
    State(state): State<AppState>,
    Json(req): Json<UpdateAssignment>,
) -> ApiResult<Json<UpdateOutcome>> {
    schedule_service::update_assignment(&state.pool, &state.locks, req).await?;
    Ok(Json(UpdateOutcome { ok: true }))
}
