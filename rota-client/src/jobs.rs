//! Computation job endpoints

use crate::RotaClient;
use crate::error::Result;
use rota_core::domain::job::Job;
use rota_core::dto::job::{JobSubmitted, SubmitJob};
use uuid::Uuid;

impl RotaClient {
    /// Submit a schedule computation
    ///
    /// Returns as soon as the server has registered the job. Use
    /// [`crate::JobPoller`] to wait for the result.
    pub async fn submit_job(&self, req: SubmitJob) -> Result<JobSubmitted> {
        let url = self.url("/api/schedule/generate");
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get a job's current state
    ///
    /// Bounded by the client's status timeout; a stalled server surfaces as
    /// a request error.
    pub async fn get_job(&self, job_id: Uuid) -> Result<Job> {
        let url = self.url(&format!("/api/schedule/generate/status/{}", job_id));
        let response = self
            .client
            .get(&url)
            .timeout(self.status_timeout)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the server's retained jobs for a year, newest first
    pub async fn list_jobs(&self, year_id: i64) -> Result<Vec<Job>> {
        let url = self.url("/api/schedule/generate/jobs");
        let response = self
            .client
            .get(&url)
            .query(&[("year_id", year_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
