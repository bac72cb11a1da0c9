//! Rotation assignment domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of schedulable weeks in an academic year
pub const WEEKS_PER_YEAR: i64 = 52;

/// A resident's rotation for one week of one year
///
/// The (`resident_id`, `year_id`, `week_number`) triple is unique; a missing
/// row means the cell is unassigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RotationAssignment {
    pub resident_id: i64,
    pub year_id: i64,
    pub week_number: i64,
    pub rotation_code: String,
}

/// Assignment grid keyed by resident, then week
pub type AssignmentGrid = BTreeMap<i64, BTreeMap<i64, String>>;

/// Groups assignments into a resident → week → code grid
pub fn to_grid(assignments: &[RotationAssignment]) -> AssignmentGrid {
    let mut grid = AssignmentGrid::new();
    for a in assignments {
        grid.entry(a.resident_id)
            .or_default()
            .insert(a.week_number, a.rotation_code.clone());
    }
    grid
}
