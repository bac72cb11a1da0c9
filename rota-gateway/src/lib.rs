//! Rota Gateway
//!
//! Reverse proxy in front of the schedule server. It forwards every `/api/*`
//! request unchanged apart from the header deny-lists, and bounds each call
//! with a per-route timeout: schedule generation may run for hours, every
//! other route gets the short default.

pub mod config;
pub mod error;
pub mod policy;
pub mod proxy;

use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        // Redirects are relayed to the caller, not followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

/// GET /health
async fn health_check() -> &'static str {
    "OK"
}

pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/{*path}", any(proxy::forward))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
