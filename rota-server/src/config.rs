//! Server configuration
//!
//! Defines the configurable parameters of the schedule server: database
//! location, bind address, solver command and job retention.

use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string (e.g., "sqlite://rota.db")
    pub database_url: String,

    /// Maximum pooled database connections
    pub max_connections: u32,

    /// Address the HTTP API listens on
    pub bind_addr: String,

    /// Executable invoked for each schedule computation
    pub solver_command: String,

    /// Extra arguments passed to the solver before the generated ones
    pub solver_args: Vec<String>,

    /// How long finished jobs stay visible to pollers
    pub job_retention: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(database_url: String) -> Self {
        Self {
            database_url,
            max_connections: 5,
            bind_addr: "0.0.0.0:8000".to_string(),
            solver_command: "rota-solver".to_string(),
            solver_args: Vec::new(),
            job_retention: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DATABASE_URL (default: sqlite://rota.db)
    /// - ROTA_MAX_CONNECTIONS (default: 5)
    /// - ROTA_BIND_ADDR (default: 0.0.0.0:8000)
    /// - ROTA_SOLVER_COMMAND (default: rota-solver)
    /// - ROTA_SOLVER_ARGS (whitespace separated, default: none)
    /// - ROTA_JOB_RETENTION (seconds, default: 86400)
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rota.db".to_string());

        let mut config = Self::new(database_url);

        if let Some(max) = std::env::var("ROTA_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            config.max_connections = max;
        }

        if let Ok(addr) = std::env::var("ROTA_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Ok(command) = std::env::var("ROTA_SOLVER_COMMAND") {
            config.solver_command = command;
        }

        if let Ok(args) = std::env::var("ROTA_SOLVER_ARGS") {
            config.solver_args = args.split_whitespace().map(str::to_string).collect();
        }

        if let Some(retention) = std::env::var("ROTA_JOB_RETENTION")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.job_retention = Duration::from_secs(retention);
        }

        config
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!("database_url must be a sqlite: connection string");
        }

        if self.max_connections == 0 {
            anyhow::bail!("max_connections must be greater than 0");
        }

        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.solver_command.trim().is_empty() {
            anyhow::bail!("solver_command cannot be empty");
        }

        if self.job_retention.is_zero() {
            anyhow::bail!("job_retention must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("sqlite://rota.db".to_string())
    }
}
