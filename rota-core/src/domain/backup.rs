//! Schedule backup domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::assignment::RotationAssignment;

/// Snapshot of assignments taken right before a clear
///
/// The snapshot never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub id: i64,
    pub year_id: i64,
    /// Set when the clear that produced this backup was limited to one resident
    pub resident_id: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Rows ordered by resident, then week
    pub assignments: Vec<RotationAssignment>,
}

/// Backup listing entry, without the snapshot payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub id: i64,
    pub year_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Backup> for BackupSummary {
    fn from(backup: Backup) -> Self {
        Self {
            id: backup.id,
            year_id: backup.year_id,
            resident_id: backup.resident_id,
            description: backup.description,
            created_at: backup.created_at,
        }
    }
}

/// Human readable description for a backup taken before clearing
pub fn clear_description(resident_id: Option<i64>) -> String {
    match resident_id {
        Some(id) => format!("Before clear (resident {})", id),
        None => "Before clear (all residents)".to_string(),
    }
}
