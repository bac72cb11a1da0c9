//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod schedule;
mod year;

pub use job::JobCommands;
pub use schedule::ScheduleCommands;
pub use year::YearCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Schedule computation jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Assignments, clear, backups and restore
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Academic years
    Year {
        #[command(subcommand)]
        command: YearCommands,
    },
}

/// Route a command to its handler module
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Schedule { command } => {
            schedule::handle_schedule_command(command, config).await
        }
        Commands::Year { command } => year::handle_year_command(command, config).await,
    }
}
