//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::{export_service, job_service, schedule_service, year_service};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    DatabaseError(sqlx::Error),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<year_service::YearError> for ApiError {
    fn from(err: year_service::YearError) -> Self {
        match err {
            year_service::YearError::NotFound(id) => {
                ApiError::NotFound(format!("Year {} not found", id))
            }
            year_service::YearError::ValidationError(msg) => ApiError::BadRequest(msg),
            year_service::YearError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<schedule_service::ScheduleError> for ApiError {
    fn from(err: schedule_service::ScheduleError) -> Self {
        match err {
            schedule_service::ScheduleError::YearNotFound(id) => {
                ApiError::NotFound(format!("Year {} not found", id))
            }
            schedule_service::ScheduleError::BackupNotFound(id) => {
                ApiError::NotFound(format!("Backup {} not found", id))
            }
            schedule_service::ScheduleError::ValidationError(msg) => ApiError::BadRequest(msg),
            schedule_service::ScheduleError::IntegrityError(msg) => ApiError::InternalError(msg),
            schedule_service::ScheduleError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<job_service::JobError> for ApiError {
    fn from(err: job_service::JobError) -> Self {
        match err {
            job_service::JobError::NotFound(id) => {
                ApiError::NotFound(format!("Job {} not found", id))
            }
            job_service::JobError::YearNotFound(id) => {
                ApiError::NotFound(format!("Year {} not found", id))
            }
            job_service::JobError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<export_service::ExportError> for ApiError {
    fn from(err: export_service::ExportError) -> Self {
        match err {
            export_service::ExportError::YearNotFound(id) => {
                ApiError::NotFound(format!("Year {} not found", id))
            }
            export_service::ExportError::Workbook(err) => {
                ApiError::InternalError(format!("Failed to build workbook: {}", err))
            }
            export_service::ExportError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
