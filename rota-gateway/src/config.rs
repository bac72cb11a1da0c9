//! Gateway configuration, read from the environment

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend service base URL, without the `/api` prefix
    pub backend_url: String,
    pub bind_addr: String,
    /// Ceiling for every route except schedule generation
    pub default_timeout: Duration,
    /// Ceiling for `POST /api/schedule/generate`
    pub generate_timeout: Duration,
    /// Largest request body the gateway buffers
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load from `GATEWAY_*` environment variables; timeouts are in seconds
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend_url: std::env::var("GATEWAY_BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            bind_addr: std::env::var("GATEWAY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            default_timeout: env_secs("GATEWAY_DEFAULT_TIMEOUT").unwrap_or(defaults.default_timeout),
            generate_timeout: env_secs("GATEWAY_GENERATE_TIMEOUT")
                .unwrap_or(defaults.generate_timeout),
            max_body_bytes: std::env::var("GATEWAY_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!(
                "GATEWAY_BACKEND_URL must be an http(s) URL, got '{}'",
                self.backend_url
            );
        }
        if self.default_timeout.is_zero() || self.generate_timeout.is_zero() {
            anyhow::bail!("Gateway timeouts must be greater than zero");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("GATEWAY_MAX_BODY_BYTES must be greater than zero");
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            default_timeout: Duration::from_secs(60),
            generate_timeout: Duration::from_secs(24 * 60 * 60),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generate_timeout, Duration::from_secs(86_400));
    }

    #[test]
    fn test_backend_url_is_trimmed() {
        let config = GatewayConfig::new("http://backend:8000/");
        assert_eq!(config.backend_url, "http://backend:8000");
    }

    #[test]
    fn test_rejects_non_http_backend() {
        let config = GatewayConfig::new("backend:8000");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = GatewayConfig {
            default_timeout: Duration::ZERO,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
