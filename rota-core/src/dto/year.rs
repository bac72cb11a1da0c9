//! Year DTOs

use serde::{Deserialize, Serialize};

/// Request to create a year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateYear {
    pub name: String,
    /// Defaults to July 1st of the first year in `name` when empty
    #[serde(default)]
    pub start_date: String,
}
