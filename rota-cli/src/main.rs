//! Rota CLI
//!
//! Command-line interface for the schedule API: submit and follow
//! computations, inspect and edit assignments, clear with backup and restore.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = "Residency rotation schedule CLI", long_about = None)]
struct Cli {
    /// Gateway or schedule server URL
    #[arg(long, env = "ROTA_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config { api_url: cli.url };

    handle_command(cli.command, &config).await
}
