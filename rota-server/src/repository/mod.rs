//! Repository Module
//!
//! Data access layer for the schedule server.
//! Functions are generic over the SQLite executor so services can run them
//! either against the pool or inside a transaction.

pub mod assignment;
pub mod backup;
pub mod year;

// Re-export for convenience
pub use assignment as assignment_repository;
pub use backup as backup_repository;
pub use year as year_repository;
