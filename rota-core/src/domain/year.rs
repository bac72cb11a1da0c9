//! Academic year domain types

use serde::{Deserialize, Serialize};

/// An academic year, the partition key for assignments, backups and jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    pub id: i64,
    /// Display name such as `2025-2026`
    pub name: String,
    /// ISO date, e.g. `2025-07-01`
    pub start_date: String,
}

/// Start date used when a year is created without one
///
/// Academic years begin on July 1st of the first calendar year in the name.
pub fn default_start_date(name: &str) -> String {
    let first = name.split('-').next().unwrap_or(name).trim();
    format!("{}-07-01", first)
}
