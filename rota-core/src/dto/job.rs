//! Job DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to start a schedule computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJob {
    pub year_id: i64,
    /// Solver time budget; `0` or absent means unbounded
    #[serde(default)]
    pub time_limit_seconds: Option<u64>,
}

/// Response to a submit, returned before the computation starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmitted {
    pub job_id: Uuid,
}
