//! Job API Handlers
//!
//! HTTP endpoints for submitting and polling schedule computations.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rota_core::domain::job::Job;
use rota_core::dto::job::{JobSubmitted, SubmitJob};
use rota_core::dto::schedule::YearQuery;

use crate::api::error::ApiResult;
use crate::service::job_service;
use crate::state::AppState;

/// POST /api/schedule/generate
/// Start a computation; answers 202 with the job id before the solver runs
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitJob>,
) -> ApiResult<(StatusCode, Json<JobSubmitted>)> {
    tracing::info!("Submitting schedule job for year: {}", req.year_id);

    let job_id = job_service::submit(&state, req).await?;

    Ok((StatusCode::ACCEPTED, Json(JobSubmitted { job_id })))
}

/// GET /api/schedule/generate/status/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    tracing::debug!("Getting job: {}", job_id);

    let job = job_service::get_job_by_ref(&state, &job_id).await?;

    Ok(Json(job))
}

/// GET /api/schedule/generate/jobs?year_id=
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<Job>>> {
    tracing::debug!("Listing jobs for year: {}", query.year_id);

    let jobs = job_service::list_jobs(&state, query.year_id).await?;

    Ok(Json(jobs))
}
