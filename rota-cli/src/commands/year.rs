//! Year command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use rota_core::domain::year::Year;
use rota_core::dto::year::CreateYear;

use crate::config::Config;

#[derive(Subcommand)]
pub enum YearCommands {
    /// List all years
    List,
    /// Show one year
    Get { id: i64 },
    /// Create a year, e.g. `rota year create 2025-2026`
    Create {
        name: String,

        /// Defaults to July 1st of the first year in the name
        #[arg(long)]
        start_date: Option<String>,
    },
}

pub async fn handle_year_command(command: YearCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        YearCommands::List => {
            let years = client.list_years().await?;
            if years.is_empty() {
                println!("{}", "No years found.".yellow());
            }
            for year in &years {
                print_year(year);
            }
        }
        YearCommands::Get { id } => print_year(&client.get_year(id).await?),
        YearCommands::Create { name, start_date } => {
            let year = client
                .create_year(CreateYear {
                    name,
                    start_date: start_date.unwrap_or_default(),
                })
                .await?;
            println!("{} Year created", "✓".green());
            print_year(&year);
        }
    }

    Ok(())
}

fn print_year(year: &Year) {
    println!(
        "  {} {} {} (starts {})",
        "▸".cyan(),
        year.id.to_string().dimmed(),
        year.name.bold(),
        year.start_date
    );
}
