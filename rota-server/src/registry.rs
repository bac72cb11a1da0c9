//! Job Registry
//!
//! In-memory keyed store of schedule computation jobs.
//!
//! Ownership rules:
//! - `JobRegistry::create` is the only way to add a job. It hands back the
//!   job's `JobWriter`, which is not `Clone`: whoever holds it is the single
//!   writer for that job.
//! - Everyone else only reads snapshots through `get`/`list_by_year`.
//! - Status changes are checked against the monotonic order, so a reader can
//!   never observe a terminal job going back to a running one.
//! - Jobs are kept while in flight and for `retention` after finishing.
//!   Nothing survives a restart; a lost job reads as unknown.

use chrono::Utc;
use rota_core::domain::job::{Job, JobResult, JobStatus, SolveParams};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Registry error type
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Job {0} is not registered")]
    UnknownJob(Uuid),

    #[error("Job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
}

/// Shared handle to the job store
#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
    retention: Duration,
}

impl JobRegistry {
    pub fn new(retention: Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Register a new pending job and return its writer
    ///
    /// Expired finished jobs are pruned first.
    pub fn create(&self, params: SolveParams) -> JobWriter {
        self.prune_expired();

        let job = Job::pending(params);
        let id = job.id;

        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, job);

        JobWriter {
            id,
            registry: self.clone(),
            finished: false,
        }
    }

    /// Snapshot of a job, or `None` if it is unknown or expired
    pub fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Snapshots of a year's retained jobs, newest first
    pub fn list_by_year(&self, year_id: i64) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|job| job.params.year_id == year_id)
            .cloned()
            .collect();

        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop finished jobs older than the retention window
    pub fn prune_expired(&self) {
        let retention = chrono::Duration::from_std(self.retention).unwrap_or(chrono::Duration::MAX);
        let now = Utc::now();

        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let before = jobs.len();
        jobs.retain(|_, job| match job.completed_at {
            Some(done) if job.is_terminal() => now.signed_duration_since(done) < retention,
            _ => true,
        });

        let pruned = before - jobs.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} expired job(s)", pruned);
        }
    }

    fn transition(
        &self,
        id: Uuid,
        next: JobStatus,
        result: Option<JobResult>,
    ) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let job = jobs.get_mut(&id).ok_or(RegistryError::UnknownJob(id))?;

        if !job.status.can_transition_to(next) {
            return Err(RegistryError::InvalidTransition {
                job_id: id,
                from: job.status,
                to: next,
            });
        }

        let now = Utc::now();
        job.status = next;
        match next {
            JobStatus::Running => job.started_at = Some(now),
            JobStatus::Completed | JobStatus::Failed => {
                job.completed_at = Some(now);
                job.result = result;
            }
            JobStatus::Pending => {}
        }

        Ok(())
    }
}

/// Exclusive write access to one job
///
/// Dropping a writer that never reported a result closes the job as failed,
/// so pollers always reach a terminal state.
pub struct JobWriter {
    id: Uuid,
    registry: JobRegistry,
    finished: bool,
}

impl JobWriter {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record that the solver has started
    pub fn mark_running(&mut self) -> Result<(), RegistryError> {
        self.registry.transition(self.id, JobStatus::Running, None)
    }

    /// Record the terminal result; the status follows `result.success`
    pub fn finish(mut self, result: JobResult) -> Result<(), RegistryError> {
        self.finished = true;
        let status = result.job_status();
        self.registry.transition(self.id, status, Some(result))
    }
}

impl Drop for JobWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        tracing::warn!("Job {} worker stopped before reporting a result", self.id);
        let result = JobResult::error("ABORTED", "Worker stopped before reporting a result");
        if let Err(e) = self
            .registry
            .transition(self.id, JobStatus::Failed, Some(result))
        {
            tracing::warn!("Could not close abandoned job: {}", e);
        }
    }
}
