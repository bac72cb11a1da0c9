//! Year Service
//!
//! Business logic for academic years.

use rota_core::domain::year::{Year, default_start_date};
use rota_core::dto::year::CreateYear;
use sqlx::SqlitePool;

use crate::repository::year_repository;

/// Service error type
#[derive(Debug)]
pub enum YearError {
    NotFound(i64),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for YearError {
    fn from(err: sqlx::Error) -> Self {
        YearError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, YearError>;

/// Create a new year
///
/// The start date defaults to July 1st of the first year in the name.
pub async fn create_year(pool: &SqlitePool, req: CreateYear) -> Result<Year> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(YearError::ValidationError(
            "Year name cannot be empty".to_string(),
        ));
    }

    if year_repository::find_by_name(pool, name).await?.is_some() {
        return Err(YearError::ValidationError(format!(
            "Year {} already exists",
            name
        )));
    }

    let start_date = match req.start_date.trim() {
        "" => default_start_date(name),
        date => date.to_string(),
    };

    let year = year_repository::create(pool, name, &start_date).await?;

    tracing::info!("Year created: {} ({})", year.name, year.id);

    Ok(year)
}

/// Get a year by ID
pub async fn get_year(pool: &SqlitePool, id: i64) -> Result<Year> {
    year_repository::find_by_id(pool, id)
        .await?
        .ok_or(YearError::NotFound(id))
}

/// List all years
pub async fn list_years(pool: &SqlitePool) -> Result<Vec<Year>> {
    Ok(year_repository::list_all(pool).await?)
}
