//! Gateway error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures the gateway answers for itself
///
/// Backend error statuses are not errors here: they are relayed unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No usable response from the backend (connect, timeout or body read)
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The caller's body could not be read, e.g. the connection dropped
    #[error("Failed to read request body: {0}")]
    RequestBody(axum::BoxError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::RequestBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        tracing::warn!("Gateway error ({}): {}", status, self);

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
