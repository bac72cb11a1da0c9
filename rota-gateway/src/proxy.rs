//! Request forwarding

use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::HeaderMap,
    response::Response,
};
use http_body_util::LengthLimitError;
use std::time::Instant;

use crate::GatewayState;
use crate::error::GatewayError;
use crate::policy;

/// ANY /api/{*path}
/// Relay one request to the backend and its response back to the caller
pub async fn forward(
    State(state): State<GatewayState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, GatewayError> {
    let started = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method;

    let target = format!(
        "{}{}",
        state.config.backend_url,
        policy::upstream_path(&path, parts.uri.query())
    );
    let timeout = policy::timeout_for(&state.config, &method, &path);

    let limit = state.config.max_body_bytes;
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| body_error(e, limit))?;

    let mut upstream = state
        .client
        .request(method.clone(), &target)
        .headers(request_headers(&parts.headers))
        .timeout(timeout);
    if policy::carries_body(&method, body.len()) {
        upstream = upstream.body(body);
    }

    let response = upstream.send().await.map_err(|e| {
        tracing::error!("{} {} -> no response: {}", method, target, e);
        e
    })?;

    let status = response.status();
    let headers = response_headers(response.headers());
    let bytes: Bytes = response.bytes().await?;

    tracing::info!(
        "{} {} -> {} ({} bytes, {:?})",
        method,
        target,
        status.as_u16(),
        bytes.len(),
        started.elapsed()
    );

    let mut relayed = Response::new(Body::from(bytes));
    *relayed.status_mut() = status;
    *relayed.headers_mut() = headers;
    Ok(relayed)
}

/// Only an exceeded limit is the caller's body being too large
fn body_error(err: axum::Error, limit: usize) -> GatewayError {
    let inner = err.into_inner();
    if inner.is::<LengthLimitError>() {
        GatewayError::BodyTooLarge { limit }
    } else {
        GatewayError::RequestBody(inner)
    }
}

fn request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if policy::forwards_request_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if policy::relays_response_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}
