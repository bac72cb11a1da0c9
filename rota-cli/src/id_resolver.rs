//! Job ID resolution
//!
//! Lets users pass a short job id prefix instead of a full UUID. Jobs are
//! only listed per year, so a prefix needs `--year` to be resolved.

use anyhow::{Context, Result, anyhow};
use rota_client::RotaClient;
use rota_core::domain::job::Job;
use uuid::Uuid;

use crate::types::IdOrPrefix;

pub async fn resolve_job_id(
    client: &RotaClient,
    id_or_prefix: &IdOrPrefix,
    year_id: Option<i64>,
) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let year_id = year_id.ok_or_else(|| {
        anyhow!(
            "'{}' is not a full job id; pass --year to resolve it as a prefix",
            id_or_prefix
        )
    })?;

    let jobs = client
        .list_jobs(year_id)
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    match_prefix(&jobs, &id_or_prefix.to_string())
}

fn match_prefix(jobs: &[Job], prefix: &str) -> Result<Uuid> {
    let matches: Vec<Uuid> = jobs
        .iter()
        .map(|job| job.id)
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        [id] => Ok(*id),
        ids => {
            let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}
