//! Forwarding policy
//!
//! Pure decisions about how one inbound request is relayed: the upstream
//! path, which headers cross in each direction, whether a body is attached
//! and how long the backend gets to answer.

use axum::http::{HeaderName, Method};
use std::time::Duration;

use crate::config::GatewayConfig;

/// Request headers never forwarded to the backend
const REQUEST_DENY: [&str; 3] = ["host", "connection", "content-length"];

/// Response headers never relayed back; the body is already decoded
const RESPONSE_DENY: [&str; 2] = ["content-encoding", "transfer-encoding"];

/// Path segments after `/api`, with empty segments dropped
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Upstream path and query for a request to `/api/{path}`
///
/// Short paths keep a trailing slash so the backend does not redirect them,
/// which would drop a POST body.
pub fn upstream_path(path: &str, query: Option<&str>) -> String {
    let segments = segments(path);
    let joined = segments.join("/");

    match query {
        Some(query) if !query.is_empty() => format!("/api/{}?{}", joined, query),
        _ if segments.len() <= 1 => {
            if joined.is_empty() {
                "/api/".to_string()
            } else {
                format!("/api/{}/", joined)
            }
        }
        _ => format!("/api/{}", joined),
    }
}

/// Only schedule generation may run long
pub fn is_generate(method: &Method, path: &str) -> bool {
    method == Method::POST && segments(path) == ["schedule", "generate"]
}

pub fn timeout_for(config: &GatewayConfig, method: &Method, path: &str) -> Duration {
    if is_generate(method, path) {
        config.generate_timeout
    } else {
        config.default_timeout
    }
}

pub fn forwards_request_header(name: &HeaderName) -> bool {
    !REQUEST_DENY.contains(&name.as_str())
}

pub fn relays_response_header(name: &HeaderName) -> bool {
    !RESPONSE_DENY.contains(&name.as_str())
}

pub fn carries_body(method: &Method, body_len: usize) -> bool {
    body_len > 0 && method != Method::GET && method != Method::HEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_gets_trailing_slash() {
        assert_eq!(upstream_path("years", None), "/api/years/");
        assert_eq!(upstream_path("years/", None), "/api/years/");
        assert_eq!(upstream_path("", None), "/api/");
    }

    #[test]
    fn test_multi_segment_path_is_left_bare() {
        assert_eq!(upstream_path("schedule/generate", None), "/api/schedule/generate");
        assert_eq!(
            upstream_path("schedule//generate/status/abc", None),
            "/api/schedule/generate/status/abc"
        );
    }

    #[test]
    fn test_query_is_appended_verbatim() {
        assert_eq!(
            upstream_path("years", Some("active=true&x=%20")),
            "/api/years?active=true&x=%20"
        );
        assert_eq!(
            upstream_path("export/excel", Some("year_id=3")),
            "/api/export/excel?year_id=3"
        );
        assert_eq!(upstream_path("years", Some("")), "/api/years/");
    }

    #[test]
    fn test_only_generate_post_gets_long_timeout() {
        let config = GatewayConfig::default();

        assert_eq!(
            timeout_for(&config, &Method::POST, "schedule/generate"),
            config.generate_timeout
        );
        assert_eq!(
            timeout_for(&config, &Method::POST, "/schedule/generate/"),
            config.generate_timeout
        );
        assert_eq!(
            timeout_for(&config, &Method::GET, "schedule/generate"),
            config.default_timeout
        );
        assert_eq!(
            timeout_for(&config, &Method::GET, "schedule/generate/status/abc"),
            config.default_timeout
        );
        assert_eq!(
            timeout_for(&config, &Method::POST, "schedule/clear"),
            config.default_timeout
        );
    }

    #[test]
    fn test_header_deny_lists() {
        for name in ["host", "connection", "content-length"] {
            assert!(!forwards_request_header(&HeaderName::from_static(name)));
        }
        assert!(forwards_request_header(&HeaderName::from_static("authorization")));
        assert!(forwards_request_header(&HeaderName::from_static("x-request-id")));

        assert!(!relays_response_header(&HeaderName::from_static("content-encoding")));
        assert!(!relays_response_header(&HeaderName::from_static("transfer-encoding")));
        assert!(relays_response_header(&HeaderName::from_static("content-disposition")));
        assert!(relays_response_header(&HeaderName::from_static("set-cookie")));
    }

    #[test]
    fn test_body_only_for_non_read_methods() {
        assert!(carries_body(&Method::POST, 10));
        assert!(carries_body(&Method::PUT, 1));
        assert!(!carries_body(&Method::POST, 0));
        assert!(!carries_body(&Method::GET, 10));
        assert!(!carries_body(&Method::HEAD, 10));
    }
}
