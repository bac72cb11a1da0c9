//! Job Service
//!
//! Submits schedule computations and runs them in the background.
//!
//! `submit` registers a pending job and returns its id right away. A spawned
//! worker owns the job's `JobWriter` for the rest of its life: it marks the
//! job running, calls the solver, writes a feasible schedule back under the
//! year lock and records the terminal result. If the worker dies on the way
//! the dropped writer closes the job as failed.

use rota_core::domain::job::{Job, JobResult, SolveParams};
use rota_core::dto::job::SubmitJob;
use uuid::Uuid;

use crate::registry::JobWriter;
use crate::repository::year_repository;
use crate::service::schedule_service;
use crate::solver::SolveOutcome;
use crate::state::AppState;

/// Service error type
#[derive(Debug)]
pub enum JobError {
    /// Unknown, expired or malformed job id, as given by the caller
    NotFound(String),
    YearNotFound(i64),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for JobError {
    fn from(err: sqlx::Error) -> Self {
        JobError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, JobError>;

/// Start a schedule computation and return its job id without waiting
pub async fn submit(state: &AppState, req: SubmitJob) -> Result<Uuid> {
    year_repository::find_by_id(&state.pool, req.year_id)
        .await?
        .ok_or(JobError::YearNotFound(req.year_id))?;

    let params = SolveParams::new(req.year_id, req.time_limit_seconds);
    let writer = state.jobs.create(params);
    let job_id = writer.id();

    tracing::info!(
        "Job {} submitted for year {} (time limit: {:?})",
        job_id,
        params.year_id,
        params.time_limit_seconds
    );

    tokio::spawn(run(state.clone(), writer, params));

    Ok(job_id)
}

/// Current snapshot of a job
pub async fn get_job(state: &AppState, id: Uuid) -> Result<Job> {
    state
        .jobs
        .get(id)
        .ok_or_else(|| JobError::NotFound(id.to_string()))
}

/// Look up a job by an id taken verbatim from a request
///
/// Job ids are opaque to callers: an id that does not parse is simply not a
/// job this server knows.
pub async fn get_job_by_ref(state: &AppState, job_ref: &str) -> Result<Job> {
    let id = Uuid::parse_str(job_ref).map_err(|_| JobError::NotFound(job_ref.to_string()))?;
    get_job(state, id).await
}

/// Retained jobs for a year, newest first
pub async fn list_jobs(state: &AppState, year_id: i64) -> Result<Vec<Job>> {
    Ok(state.jobs.list_by_year(year_id))
}

// =============================================================================
// Worker
// =============================================================================

async fn run(state: AppState, mut writer: JobWriter, params: SolveParams) {
    let job_id = writer.id();

    if let Err(e) = writer.mark_running() {
        tracing::error!("Job {} could not start: {}", job_id, e);
        return;
    }

    let result = match state.solver.solve(params).await {
        Ok(outcome) => apply(&state, params, outcome).await,
        Err(e) => {
            tracing::error!("Job {} solver error: {:#}", job_id, e);
            JobResult::error("ERROR", format!("{:#}", e))
        }
    };

    tracing::info!(
        "Job {} finished: {} (success: {})",
        job_id,
        result.status,
        result.success
    );

    if let Err(e) = writer.finish(result) {
        tracing::error!("Job {} result was not recorded: {}", job_id, e);
    }
}

/// Persist a feasible schedule and turn the outcome into the job result
async fn apply(state: &AppState, params: SolveParams, outcome: SolveOutcome) -> JobResult {
    let result = outcome.to_result();
    if !outcome.success {
        return result;
    }

    let Some(grid) = outcome.assignments else {
        return result;
    };

    match schedule_service::replace_year(&state.pool, &state.locks, params.year_id, &grid).await {
        Ok(_) => result,
        Err(e) => {
            tracing::error!("Failed to save schedule for year {}: {:?}", params.year_id, e);
            JobResult::error(
                "ERROR",
                format!("Schedule was solved but could not be saved: {:?}", e),
            )
        }
    }
}
