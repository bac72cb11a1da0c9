//! Rota Server
//!
//! Backend service for schedule computation and schedule mutation:
//! - Job orchestration: submit a solver run, poll it until it finishes
//! - Mutation safety: confirmed clears that always leave a backup, and restores
//! - Assignment editing, year management and spreadsheet export

pub mod api;
pub mod config;
pub mod db;
pub mod locks;
pub mod registry;
pub mod repository;
pub mod service;
pub mod solver;
pub mod state;
