//! Service Module
//!
//! Business logic layer for the schedule server.
//! Services orchestrate between repositories and contain domain logic.

pub mod export;
pub mod job;
pub mod schedule;
pub mod year;

// Re-export for convenience
pub use export as export_service;
pub use job as job_service;
pub use schedule as schedule_service;
pub use year as year_service;
