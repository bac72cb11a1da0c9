//! Year API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rota_core::domain::year::Year;
use rota_core::dto::year::CreateYear;

use crate::api::error::ApiResult;
use crate::service::year_service;
use crate::state::AppState;

/// POST /api/years
pub async fn create_year(
    State(state): State<AppState>,
    Json(req): Json<CreateYear>,
) -> ApiResult<(StatusCode, Json<Year>)> {
    tracing::info!("Creating year: {}", req.name);

    let year = year_service::create_year(&state.pool, req).await?;

    Ok((StatusCode::CREATED, Json(year)))
}

/// GET /api/years
pub async fn list_years(State(state): State<AppState>) -> ApiResult<Json<Vec<Year>>> {
    let years = year_service::list_years(&state.pool).await?;
    Ok(Json(years))
}

/// GET /api/years/{id}
pub async fn get_year(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Year>> {
    let year = year_service::get_year(&state.pool, id).await?;
    Ok(Json(year))
}
