//! Year Repository
//!
//! Handles all database operations related to academic years.

use rota_core::domain::year::Year;
use sqlx::{Executor, Sqlite};

/// Create a new year
pub async fn create<'e, E>(executor: E, name: &str, start_date: &str) -> Result<Year, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO years (name, start_date) VALUES (?, ?)")
        .bind(name)
        .bind(start_date)
        .execute(executor)
        .await?;

    Ok(Year {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        start_date: start_date.to_string(),
    })
}

/// Find a year by ID
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Year>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, YearRow>("SELECT id, name, start_date FROM years WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a year by its display name
pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Year>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row =
        sqlx::query_as::<_, YearRow>("SELECT id, name, start_date FROM years WHERE name = ?")
            .bind(name)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(|r| r.into()))
}

/// List all years, oldest first
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Year>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, YearRow>("SELECT id, name, start_date FROM years ORDER BY id")
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct YearRow {
    id: i64,
    name: String,
    start_date: String,
}

impl From<YearRow> for Year {
    fn from(row: YearRow) -> Self {
        Year {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
        }
    }
}
