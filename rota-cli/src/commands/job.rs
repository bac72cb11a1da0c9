//! Job command handlers
//!
//! Submitting computations, following them to the end and inspecting the
//! jobs a server still remembers.

use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::*;
use rota_client::{ClientError, JobPoller, PollOutcome, RotaClient};
use rota_core::domain::job::{Job, JobResult, JobStatus};
use rota_core::dto::job::SubmitJob;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Start a schedule computation for a year
    Submit {
        #[arg(long)]
        year: i64,

        /// Solver time budget in seconds (0 for none)
        #[arg(long)]
        time_limit: Option<u64>,

        /// Print the job id and return without waiting
        #[arg(long)]
        no_wait: bool,

        /// Seconds between status checks while waiting
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
    /// Show a job's current state
    Status {
        /// Job ID, or a prefix together with --year
        id: String,

        #[arg(long)]
        year: Option<i64>,

        /// Print the raw job as JSON
        #[arg(long)]
        json: bool,
    },
    /// Wait for a job to finish
    Wait {
        /// Job ID, or a prefix together with --year
        id: String,

        #[arg(long)]
        year: Option<i64>,

        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
    /// List the jobs retained for a year
    List {
        #[arg(long)]
        year: i64,
    },
}

pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::Submit {
            year,
            time_limit,
            no_wait,
            interval,
        } => submit(&client, year, time_limit, no_wait, interval).await,
        JobCommands::Status { id, year, json } => status(&client, &id, year, json).await,
        JobCommands::Wait { id, year, interval } => {
            let job_id = resolve_job_id(&client, &IdOrPrefix::parse(&id), year).await?;
            wait(client, job_id, interval).await
        }
        JobCommands::List { year } => list(&client, year).await,
    }
}

async fn submit(
    client: &RotaClient,
    year_id: i64,
    time_limit_seconds: Option<u64>,
    no_wait: bool,
    interval: u64,
) -> Result<()> {
    let submitted = client
        .submit_job(SubmitJob {
            year_id,
            time_limit_seconds,
        })
        .await?;

    println!(
        "{} Submitted job {}",
        "✓".green(),
        submitted.job_id.to_string().cyan()
    );

    if no_wait {
        return Ok(());
    }

    wait(client.clone(), submitted.job_id, interval).await
}

async fn status(client: &RotaClient, id: &str, year: Option<i64>, json: bool) -> Result<()> {
    let job_id = resolve_job_id(client, &IdOrPrefix::parse(id), year).await?;
    let job = client.get_job(job_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        print_job_details(&job);
    }

    Ok(())
}

/// Poll until the job ends; a lost job and a failed computation exit differently
async fn wait(client: RotaClient, job_id: Uuid, interval: u64) -> Result<()> {
    let poller = JobPoller::new(client).with_interval(Duration::from_secs(interval.max(1)));

    let mut last = None;
    let outcome = poller
        .wait_with(job_id, |job| {
            if last != Some(job.status) {
                println!("  {} {}", "▸".cyan(), colorize_status(job.status));
                last = Some(job.status);
            }
        })
        .await;

    match outcome {
        Ok(PollOutcome::Completed(result)) => {
            println!("{} Schedule computed ({})", "✓".green(), result.status);
            if let Some(message) = &result.message {
                println!("  {}", message.dimmed());
            }
            Ok(())
        }
        Ok(PollOutcome::Failed(result)) => {
            println!("{} Computation failed ({})", "✗".red(), result.status);
            print_result_details(&result);
            Err(anyhow!("Computation failed"))
        }
        Err(ClientError::JobLost { job_id, reason }) => {
            println!("{} Job lost or server unreachable", "✗".red());
            println!("  {}", reason.dimmed());
            Err(anyhow!("Job {} lost or server unreachable", job_id))
        }
        Err(e) => Err(e.into()),
    }
}

async fn list(client: &RotaClient, year_id: i64) -> Result<()> {
    let jobs = client.list_jobs(year_id).await?;

    if jobs.is_empty() {
        println!("{}", format!("No jobs found for year {}.", year_id).yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} job(s):", jobs.len()).bold());
    println!();
    for job in jobs {
        println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
        println!("    Status:    {}", colorize_status(job.status));
        println!(
            "    Submitted: {}",
            job.submitted_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
        println!();
    }

    Ok(())
}

fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:         {}", job.id.to_string().cyan());
    println!("  Year:       {}", job.params.year_id);
    println!("  Status:     {}", colorize_status(job.status));
    if let Some(limit) = job.params.time_limit_seconds {
        println!("  Time limit: {}s", limit);
    }
    println!(
        "  Submitted:  {}",
        job.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(started) = job.started_at {
        println!("  Started:    {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(completed) = job.completed_at {
        println!("  Completed:  {}", completed.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = job.started_at {
            let seconds = completed.signed_duration_since(started).num_seconds();
            println!("  Duration:   {}s", seconds);
        }
    }

    if let Some(result) = &job.result {
        println!("\n{}", "Result:".bold());
        println!(
            "  Success:    {}",
            if result.success {
                "✓".green()
            } else {
                "✗".red()
            }
        );
        println!("  Solver:     {}", result.status);
        print_result_details(result);
    }
}

fn print_result_details(result: &JobResult) {
    if let Some(message) = &result.message {
        println!("  {}", message.red());
    }
    if !result.conflicts.is_empty() {
        println!("\n{}", "Conflicts:".bold());
        for conflict in &result.conflicts {
            println!("  {} {}", "•".red(), conflict);
        }
    }
}

fn colorize_status(status: JobStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        JobStatus::Pending => label.yellow(),
        JobStatus::Running => label.cyan(),
        JobStatus::Completed => label.green(),
        JobStatus::Failed => label.red(),
    }
}
