//! Core domain types
//!
//! This module contains the core domain structures used across Rota services.
//! They are shared between the server (which persists and tracks them) and
//! the client and CLI (which display them).

pub mod assignment;
pub mod backup;
pub mod job;
pub mod year;
