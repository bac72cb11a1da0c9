//! Job polling
//!
//! Waits for a submitted computation by reading its status on a fixed
//! interval until it reaches a terminal state.
//!
//! A job that cannot be read (unknown id, transport failure, bad response)
//! ends the wait immediately with [`ClientError::JobLost`]. It is never
//! reported as a failed computation: a lost job says nothing about whether
//! the schedule was solvable.

use async_trait::async_trait;
use rota_core::domain::job::{Job, JobResult, JobStatus};
use std::time::Duration;
use uuid::Uuid;

use crate::RotaClient;
use crate::error::{ClientError, Result};

/// Default delay between two status reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Anything that can report a job's current state
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn fetch_job(&self, job_id: Uuid) -> Result<Job>;
}

#[async_trait]
impl JobStatusSource for RotaClient {
    async fn fetch_job(&self, job_id: Uuid) -> Result<Job> {
        self.get_job(job_id).await
    }
}

/// How a job that was observed to the end finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(JobResult),
    /// The computation ran and reported failure, e.g. infeasible constraints
    Failed(JobResult),
}

pub struct JobPoller<S> {
    source: S,
    interval: Duration,
}

impl<S: JobStatusSource> JobPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait until the job finishes
    pub async fn wait(&self, job_id: Uuid) -> Result<PollOutcome> {
        self.wait_with(job_id, |_| {}).await
    }

    /// Wait until the job finishes, reporting every status read
    pub async fn wait_with<F>(&self, job_id: Uuid, mut on_status: F) -> Result<PollOutcome>
    where
        F: FnMut(&Job) + Send,
    {
        loop {
            let job = self
                .source
                .fetch_job(job_id)
                .await
                .map_err(|e| lost(job_id, e))?;

            on_status(&job);

            match job.status {
                JobStatus::Pending | JobStatus::Running => {
                    tracing::debug!("Job {} is {}", job_id, job.status);
                    tokio::time::sleep(self.interval).await;
                }
                JobStatus::Completed => {
                    return Ok(PollOutcome::Completed(result_or_default(job)));
                }
                JobStatus::Failed => {
                    return Ok(PollOutcome::Failed(result_or_default(job)));
                }
            }
        }
    }
}

fn lost(job_id: Uuid, err: ClientError) -> ClientError {
    let reason = if err.is_not_found() {
        "the server no longer knows this job".to_string()
    } else {
        err.to_string()
    };
    tracing::warn!("Job {} lost: {}", job_id, reason);
    ClientError::JobLost { job_id, reason }
}

/// Terminal jobs always carry a result; tolerate servers that omit it
fn result_or_default(job: Job) -> JobResult {
    let success = job.status == JobStatus::Completed;
    job.result.unwrap_or_else(|| JobResult {
        success,
        status: job.status.as_str().to_uppercase(),
        message: None,
        conflicts: Vec::new(),
    })
}
