//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One schedule computation attempt
///
/// Created by submit, written only by the worker executing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub params: SolveParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
}

impl Job {
    /// Creates a new pending job for the given parameters
    pub fn pending(params: SolveParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
            params,
            result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Parameters handed to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveParams {
    pub year_id: i64,
    /// Time budget for the solver. `None` lets it run as long as it needs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u64>,
}

impl SolveParams {
    /// Builds solver parameters, treating a zero budget as no budget
    pub fn new(year_id: i64, time_limit_seconds: Option<u64>) -> Self {
        Self {
            year_id,
            time_limit_seconds: time_limit_seconds.filter(|secs| *secs > 0),
        }
    }
}

/// Job lifecycle status
///
/// Transitions only move forward: pending → running → completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether no further transition can happen from this status
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` respects the monotonic order
    ///
    /// `Pending → Failed` is allowed so a worker that dies before starting
    /// can still close its job.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub success: bool,
    /// Solver status string, e.g. `OPTIMAL`, `FEASIBLE`, `INFEASIBLE`
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human readable conflict descriptions, empty on success
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl JobResult {
    pub fn succeeded(status: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: true,
            status: status.into(),
            message,
            conflicts: Vec::new(),
        }
    }

    pub fn infeasible(status: impl Into<String>, conflicts: Vec<String>) -> Self {
        Self {
            success: false,
            status: status.into(),
            message: None,
            conflicts,
        }
    }

    /// A failure that happened around the solver rather than inside it
    pub fn error(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: status.into(),
            message: Some(message.into()),
            conflicts: Vec::new(),
        }
    }

    /// The terminal job status this result maps to
    pub fn job_status(&self) -> JobStatus {
        if self.success {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        }
    }
}
