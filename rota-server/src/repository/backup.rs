//! Backup Repository
//!
//! Handles all database operations related to schedule backups. Backups are
//! insert-only: there is no update or delete here.

use chrono::{DateTime, Utc};
use rota_core::domain::assignment::RotationAssignment;
use rota_core::domain::backup::{Backup, BackupSummary};
use sqlx::{Executor, Sqlite};

/// Store a new backup holding the given snapshot
pub async fn create<'e, E>(
    executor: E,
    year_id: i64,
    resident_id: Option<i64>,
    description: &str,
    assignments: &[RotationAssignment],
) -> Result<Backup, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();
    let snapshot = serde_json::to_string(assignments)
        .map_err(|e| sqlx::Error::Protocol(format!("Failed to encode backup snapshot: {}", e)))?;

    let result = sqlx::query(
        r#"
        INSERT INTO schedule_backups (year_id, resident_id, description, assignments_json, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(year_id)
    .bind(resident_id)
    .bind(description)
    .bind(&snapshot)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(Backup {
        id: result.last_insert_rowid(),
        year_id,
        resident_id,
        description: description.to_string(),
        created_at: now,
        assignments: assignments.to_vec(),
    })
}

/// Find a backup, including its snapshot, by ID
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Backup>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, BackupRow>(
        r#"
        SELECT id, year_id, resident_id, description, assignments_json, created_at
        FROM schedule_backups
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Backup::try_from).transpose()
}

/// List backups for a year, newest first
pub async fn list_by_year<'e, E>(executor: E, year_id: i64) -> Result<Vec<BackupSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, BackupSummaryRow>(
        r#"
        SELECT id, year_id, resident_id, description, created_at
        FROM schedule_backups
        WHERE year_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(year_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count backups for a year
pub async fn count_by_year<'e, E>(executor: E, year_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schedule_backups WHERE year_id = ?")
        .bind(year_id)
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct BackupRow {
    id: i64,
    year_id: i64,
    resident_id: Option<i64>,
    description: String,
    assignments_json: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BackupRow> for Backup {
    type Error = sqlx::Error;

    fn try_from(row: BackupRow) -> Result<Self, Self::Error> {
        let assignments: Vec<RotationAssignment> = serde_json::from_str(&row.assignments_json)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Backup {
            id: row.id,
            year_id: row.year_id,
            resident_id: row.resident_id,
            description: row.description,
            created_at: row.created_at,
            assignments,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BackupSummaryRow {
    id: i64,
    year_id: i64,
    resident_id: Option<i64>,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<BackupSummaryRow> for BackupSummary {
    fn from(row: BackupSummaryRow) -> Self {
        BackupSummary {
            id: row.id,
            year_id: row.year_id,
            resident_id: row.resident_id,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
