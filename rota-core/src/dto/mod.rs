//! Data Transfer Objects
//!
//! Request and response bodies for the Rota HTTP API. DTOs are kept separate
//! from the domain types so wire shapes can evolve independently.

pub mod job;
pub mod schedule;
pub mod year;
