//! Assignment Repository
//!
//! Handles all database operations on rotation assignments. A `resident_id`
//! of `None` scopes an operation to the whole year.

use rota_core::domain::assignment::RotationAssignment;
use sqlx::{Executor, Sqlite};

/// Find assignments in scope, ordered by resident then week
pub async fn find_scope<'e, E>(
    executor: E,
    year_id: i64,
    resident_id: Option<i64>,
) -> Result<Vec<RotationAssignment>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, AssignmentRow>(
        r#"
        SELECT resident_id, year_id, week_number, rotation_code
        FROM schedule_assignments
        WHERE year_id = ? AND (? IS NULL OR resident_id = ?)
        ORDER BY resident_id ASC, week_number ASC
        "#,
    )
    .bind(year_id)
    .bind(resident_id)
    .bind(resident_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Delete assignments in scope, returning the number of rows removed
pub async fn delete_scope<'e, E>(
    executor: E,
    year_id: i64,
    resident_id: Option<i64>,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "DELETE FROM schedule_assignments WHERE year_id = ? AND (? IS NULL OR resident_id = ?)",
    )
    .bind(year_id)
    .bind(resident_id)
    .bind(resident_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Insert a single assignment
pub async fn insert<'e, E>(executor: E, assignment: &RotationAssignment) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO schedule_assignments (resident_id, year_id, week_number, rotation_code)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(assignment.resident_id)
    .bind(assignment.year_id)
    .bind(assignment.week_number)
    .bind(&assignment.rotation_code)
    .execute(executor)
    .await?;

    Ok(())
}

/// Set the rotation for one cell, replacing any existing code
pub async fn upsert<'e, E>(executor: E, assignment: &RotationAssignment) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO schedule_assignments (resident_id, year_id, week_number, rotation_code)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (resident_id, year_id, week_number)
        DO UPDATE SET rotation_code = excluded.rotation_code
        "#,
    )
    .bind(assignment.resident_id)
    .bind(assignment.year_id)
    .bind(assignment.week_number)
    .bind(&assignment.rotation_code)
    .execute(executor)
    .await?;

    Ok(())
}

/// Remove one cell, returning whether it existed
pub async fn delete_cell<'e, E>(
    executor: E,
    resident_id: i64,
    year_id: i64,
    week_number: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "DELETE FROM schedule_assignments WHERE resident_id = ? AND year_id = ? AND week_number = ?",
    )
    .bind(resident_id)
    .bind(year_id)
    .bind(week_number)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Count assignments for a year
pub async fn count_by_year<'e, E>(executor: E, year_id: i64) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schedule_assignments WHERE year_id = ?")
        .bind(year_id)
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    resident_id: i64,
    year_id: i64,
    week_number: i64,
    rotation_code: String,
}

impl From<AssignmentRow> for RotationAssignment {
    fn from(row: AssignmentRow) -> Self {
        RotationAssignment {
            resident_id: row.resident_id,
            year_id: row.year_id,
            week_number: row.week_number,
            rotation_code: row.rotation_code,
        }
    }
}
