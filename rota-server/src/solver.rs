//! Solver adapter
//!
//! The combinatorial solver lives outside this service. The `Solver` trait is
//! the seam the job worker calls; `CommandSolver` runs an external executable
//! and reads its verdict as JSON from stdout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rota_core::domain::assignment::AssignmentGrid;
use rota_core::domain::job::{JobResult, SolveParams};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

/// What the solver reports back for one computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub success: bool,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Resident → week → rotation code, present on feasible runs
    #[serde(default)]
    pub assignments: Option<AssignmentGrid>,
}

impl SolveOutcome {
    /// The job result recorded for this outcome
    pub fn to_result(&self) -> JobResult {
        JobResult {
            success: self.success,
            status: self.status.clone(),
            message: self.message.clone(),
            conflicts: if self.success {
                Vec::new()
            } else {
                self.conflicts.clone()
            },
        }
    }
}

/// Runs one schedule computation to completion
///
/// An `Err` means the solver could not be run or its answer could not be
/// read. An infeasible schedule is an `Ok` outcome with `success: false`.
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, params: SolveParams) -> Result<SolveOutcome>;
}

/// Solver backed by an external command
///
/// Invoked as `<program> <args..> --year-id <id> [--time-limit <secs>]`.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
}

impl CommandSolver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command_args(&self, params: SolveParams) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("--year-id".to_string());
        args.push(params.year_id.to_string());
        if let Some(limit) = params.time_limit_seconds {
            args.push("--time-limit".to_string());
            args.push(limit.to_string());
        }
        args
    }
}

#[async_trait]
impl Solver for CommandSolver {
    async fn solve(&self, params: SolveParams) -> Result<SolveOutcome> {
        let args = self.command_args(params);
        tracing::info!("Running solver: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to start solver '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Solver exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        serde_json::from_slice(&output.stdout).context("Solver produced invalid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_include_optional_time_limit() {
        let solver = CommandSolver::new("solve", vec!["--threads".into(), "4".into()]);

        assert_eq!(
            solver.command_args(SolveParams::new(7, None)),
            vec!["--threads", "4", "--year-id", "7"]
        );
        assert_eq!(
            solver.command_args(SolveParams::new(7, Some(300))),
            vec!["--threads", "4", "--year-id", "7", "--time-limit", "300"]
        );
    }

    #[test]
    fn test_successful_outcome_drops_conflicts() {
        let outcome = SolveOutcome {
            success: true,
            status: "OPTIMAL".into(),
            conflicts: vec!["stale".into()],
            ..Default::default()
        };
        assert!(outcome.to_result().conflicts.is_empty());
    }

    #[test]
    fn test_outcome_parses_assignment_grid() {
        let json = r#"{
            "success": true,
            "status": "FEASIBLE",
            "assignments": {"12": {"1": "A", "2": "ICU"}}
        }"#;
        let outcome: SolveOutcome = serde_json::from_str(json).unwrap();

        let grid = outcome.assignments.unwrap();
        assert_eq!(grid[&12][&2], "ICU");
        assert!(outcome.conflicts.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_solver_reads_stdout() {
        let script = r#"echo "{\"success\":false,\"status\":\"INFEASIBLE\",\"conflicts\":[\"year $2\"]}""#;
        let solver = CommandSolver::new("sh", vec!["-c".into(), script.into(), "solver".into()]);

        let outcome = solver.solve(SolveParams::new(7, None)).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.status, "INFEASIBLE");
        assert_eq!(outcome.conflicts, vec!["year 7"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_solver_reports_nonzero_exit() {
        let solver = CommandSolver::new(
            "sh",
            vec!["-c".into(), "echo boom >&2; exit 3".into()],
        );

        let err = solver.solve(SolveParams::new(7, None)).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let solver = CommandSolver::new("rota-solver-that-does-not-exist", Vec::new());
        assert!(solver.solve(SolveParams::new(7, None)).await.is_err());
    }
}
