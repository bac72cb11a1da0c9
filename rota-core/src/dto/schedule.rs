//! Schedule mutation DTOs

use serde::{Deserialize, Serialize};

/// Phrase that must be typed exactly to confirm a destructive clear
pub const CONFIRM_PHRASE: &str = "DELETE";

/// Request to clear assignments for a year, or one resident within it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearSchedule {
    pub year_id: i64,
    #[serde(default)]
    pub resident_id: Option<i64>,
    #[serde(default)]
    pub confirm_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearOutcome {
    pub ok: bool,
    pub cleared: u64,
    pub backup_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreOutcome {
    pub ok: bool,
    pub restored: u64,
}

/// Single-cell edit; an empty `rotation_code` unassigns the cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssignment {
    pub resident_id: i64,
    pub year_id: i64,
    pub week_number: i64,
    #[serde(default)]
    pub rotation_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub ok: bool,
}

/// `?year_id=` query used by year-scoped listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearQuery {
    pub year_id: i64,
}
