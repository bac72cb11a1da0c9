//! Schedule command handlers
//!
//! Viewing and editing assignments, plus the destructive clear which asks
//! for the confirmation phrase and reports the backup it left behind.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rota_client::RotaClient;
use rota_core::domain::assignment::{AssignmentGrid, WEEKS_PER_YEAR};
use rota_core::dto::schedule::{CONFIRM_PHRASE, ClearSchedule, UpdateAssignment};
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Print the assignment grid for a year
    Show {
        #[arg(long)]
        year: i64,

        /// Only this resident's row
        #[arg(long)]
        resident: Option<i64>,
    },
    /// Set one cell; omit --code to clear it
    Set {
        #[arg(long)]
        year: i64,

        #[arg(long)]
        resident: i64,

        #[arg(long)]
        week: i64,

        #[arg(long, default_value = "")]
        code: String,
    },
    /// Clear a year's assignments (or one resident's), keeping a backup
    Clear {
        #[arg(long)]
        year: i64,

        #[arg(long)]
        resident: Option<i64>,

        /// Confirmation phrase; prompted for when absent
        #[arg(long)]
        confirm: Option<String>,
    },
    /// List backups for a year, newest first
    Backups {
        #[arg(long)]
        year: i64,
    },
    /// Restore a backup over the current assignments
    Restore { backup_id: i64 },
    /// Download the year's schedule as a spreadsheet
    Export {
        #[arg(long)]
        year: i64,

        /// Output file; defaults to the server's suggested name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn handle_schedule_command(command: ScheduleCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        ScheduleCommands::Show { year, resident } => show(&client, year, resident).await,
        ScheduleCommands::Set {
            year,
            resident,
            week,
            code,
        } => {
            client
                .update_assignment(UpdateAssignment {
                    resident_id: resident,
                    year_id: year,
                    week_number: week,
                    rotation_code: code.clone(),
                })
                .await?;
            if code.trim().is_empty() {
                println!("{} Cleared resident {} week {}", "✓".green(), resident, week);
            } else {
                println!(
                    "{} Resident {} week {} set to {}",
                    "✓".green(),
                    resident,
                    week,
                    code.trim().cyan()
                );
            }
            Ok(())
        }
        ScheduleCommands::Clear {
            year,
            resident,
            confirm,
        } => clear(&client, year, resident, confirm).await,
        ScheduleCommands::Backups { year } => backups(&client, year).await,
        ScheduleCommands::Restore { backup_id } => {
            let outcome = client.restore_backup(backup_id).await?;
            println!(
                "{} Restored {} assignment(s) from backup {}",
                "✓".green(),
                outcome.restored,
                backup_id
            );
            Ok(())
        }
        ScheduleCommands::Export { year, output } => export(&client, year, output).await,
    }
}

async fn show(client: &RotaClient, year_id: i64, resident: Option<i64>) -> Result<()> {
    let mut grid = client.get_assignments(year_id).await?;
    if let Some(resident) = resident {
        grid.retain(|id, _| *id == resident);
    }

    if grid.is_empty() {
        println!("{}", "No assignments found.".yellow());
        return Ok(());
    }

    print!("{}", render_grid(&grid));
    Ok(())
}

/// One line per resident, one fixed-width column per week
fn render_grid(grid: &AssignmentGrid) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:>10} ", "resident"));
    for week in 1..=WEEKS_PER_YEAR {
        out.push_str(&format!("{:>5}", week));
    }
    out.push('\n');

    for (resident, weeks) in grid {
        out.push_str(&format!("{:>10} ", resident));
        for week in 1..=WEEKS_PER_YEAR {
            let code = weeks.get(&week).map(String::as_str).unwrap_or("·");
            let code: String = code.chars().take(4).collect();
            out.push_str(&format!("{:>5}", code));
        }
        out.push('\n');
    }

    out
}

async fn clear(
    client: &RotaClient,
    year_id: i64,
    resident_id: Option<i64>,
    confirm: Option<String>,
) -> Result<()> {
    let confirm_text = match confirm {
        Some(text) => text,
        None => prompt_confirmation(year_id, resident_id)?,
    };

    let outcome = client
        .clear_schedule(ClearSchedule {
            year_id,
            resident_id,
            confirm_text,
        })
        .await?;

    println!(
        "{} Cleared {} assignment(s); backup {} holds them",
        "✓".green(),
        outcome.cleared,
        outcome.backup_id.to_string().cyan()
    );
    println!(
        "  {}",
        format!("Undo with: rota schedule restore {}", outcome.backup_id).dimmed()
    );

    Ok(())
}

fn prompt_confirmation(year_id: i64, resident_id: Option<i64>) -> Result<String> {
    let scope = match resident_id {
        Some(id) => format!("resident {} in year {}", id, year_id),
        None => format!("all residents in year {}", year_id),
    };
    print!(
        "This clears {}. Type {} to confirm: ",
        scope.bold(),
        CONFIRM_PHRASE.red().bold()
    );
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;

    // Only the newline is stripped; the server compares the rest exactly
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn backups(client: &RotaClient, year_id: i64) -> Result<()> {
    let backups = client.list_backups(year_id).await?;

    if backups.is_empty() {
        println!("{}", format!("No backups for year {}.", year_id).yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} backup(s):", backups.len()).bold());
    for backup in backups {
        println!(
            "  {} {}  {}  {}",
            "▸".cyan(),
            backup.id.to_string().bold(),
            backup
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed(),
            backup.description
        );
    }

    Ok(())
}

async fn export(client: &RotaClient, year_id: i64, output: Option<PathBuf>) -> Result<()> {
    let export = client.export_schedule(year_id).await?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(
            export
                .filename
                .clone()
                .unwrap_or_else(|| format!("schedule_{}.xlsx", year_id)),
        )
    });

    tokio::fs::write(&path, &export.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Wrote {} ({} bytes)",
        "✓".green(),
        path.display().to_string().cyan(),
        export.bytes.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid_marks_empty_weeks() {
        let mut grid = AssignmentGrid::new();
        grid.entry(12).or_default().insert(1, "ICU".to_string());
        grid.entry(12).or_default().insert(3, "VACATION".to_string());

        let rendered = render_grid(&grid);
        let row = rendered.lines().nth(1).unwrap();

        assert!(row.trim_start().starts_with("12"));
        assert!(row.contains("  ICU    · VACA"));
    }
}
