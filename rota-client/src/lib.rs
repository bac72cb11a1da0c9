//! Rota HTTP Client
//!
//! A type-safe HTTP client for the schedule API, used by the CLI and by
//! tests. Works against the schedule server directly or through the gateway.
//!
//! # Example
//!
//! ```no_run
//! use rota_client::{JobPoller, PollOutcome, RotaClient};
//! use rota_core::dto::job::SubmitJob;
//!
//! #[tokio::main]
//! async fn main() -> rota_client::Result<()> {
//!     let client = RotaClient::new("http://localhost:3000");
//!
//!     let submitted = client
//!         .submit_job(SubmitJob { year_id: 1, time_limit_seconds: Some(300) })
//!         .await?;
//!
//!     match JobPoller::new(client).wait(submitted.job_id).await? {
//!         PollOutcome::Completed(result) => println!("Solved: {}", result.status),
//!         PollOutcome::Failed(result) => println!("Failed: {:?}", result.conflicts),
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
pub mod poller;
mod schedule;
mod years;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::{JobPoller, JobStatusSource, PollOutcome};
pub use schedule::Export;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Upper bound on a single job status read
///
/// Status reads are answered from memory, so a server that takes longer is
/// treated as unreachable rather than waited on.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the schedule API
///
/// Methods are grouped by area:
/// - Computation jobs (submit, status, list)
/// - Schedule assignments, clear, backups and restore
/// - Export
/// - Years
#[derive(Debug, Clone)]
pub struct RotaClient {
    /// Base URL of the API (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Timeout applied to job status reads
    status_timeout: Duration,
}

impl RotaClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use rota_client::RotaClient;
    ///
    /// let client = RotaClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    /// Override the timeout for job status reads
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Turn a non-success response into an `ApiError`
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                error::error_message(&body),
            ));
        }

        Ok(response)
    }
}
