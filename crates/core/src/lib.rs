//! Domain-level utilities shared across the interview platform backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! database, client, and API layers alike.

pub mod error;
pub mod object_paths;
pub mod signing;
pub mod types;
