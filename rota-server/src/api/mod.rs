//! API Module
//!
//! HTTP API layer for the schedule server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod export;
pub mod health;
pub mod job;
pub mod schedule;
pub mod year;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Computation jobs
        .route("/api/schedule/generate", post(job::submit_job))
        .route(
            "/api/schedule/generate/status/{job_id}",
            get(job::get_job),
        )
        .route("/api/schedule/generate/jobs", get(job::list_jobs))
        // Guarded bulk mutation
        .route("/api/schedule/clear", post(schedule::clear_schedule))
        .route("/api/schedule/backups", get(schedule::list_backups))
        .route(
            "/api/schedule/restore/{backup_id}",
            post(schedule::restore_backup),
        )
        // Assignment grid
        .route("/api/schedule/assignments", get(schedule::get_assignments))
        .route("/api/schedule/assignment", put(schedule::update_assignment))
        // Export
        .route("/api/export/excel", get(export::export_excel))
        // Years; the gateway adds a trailing slash to single-segment paths
        .route("/api/years", get(year::list_years).post(year::create_year))
        .route("/api/years/", get(year::list_years).post(year::create_year))
        .route("/api/years/{id}", get(year::get_year))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
