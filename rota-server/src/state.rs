//! Shared application state handed to every handler and job worker

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::locks::YearLocks;
use crate::registry::JobRegistry;
use crate::solver::{CommandSolver, Solver};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jobs: JobRegistry,
    pub locks: YearLocks,
    pub solver: Arc<dyn Solver>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jobs: JobRegistry, solver: Arc<dyn Solver>) -> Self {
        Self {
            pool,
            jobs,
            locks: YearLocks::new(),
            solver,
        }
    }

    /// State wired with the configured external solver
    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        let solver = CommandSolver::new(config.solver_command.clone(), config.solver_args.clone());
        Self::new(pool, JobRegistry::new(config.job_retention), Arc::new(solver))
    }
}
