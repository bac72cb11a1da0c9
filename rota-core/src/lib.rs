//! Rota Core
//!
//! Core types shared by the Rota schedule services.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, RotationAssignment, Backup, Year)
//! - DTOs: Request and response bodies exchanged over HTTP

pub mod domain;
pub mod dto;
