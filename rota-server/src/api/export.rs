//! Export API Handler

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use rota_core::dto::schedule::YearQuery;

use crate::api::error::ApiResult;
use crate::service::export_service::{self, XLSX_CONTENT_TYPE};
use crate::state::AppState;

/// GET /api/export/excel?year_id=
/// Download the year's schedule as an xlsx attachment
pub async fn export_excel(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<impl IntoResponse> {
    let file = export_service::export_year(&state.pool, query.year_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
