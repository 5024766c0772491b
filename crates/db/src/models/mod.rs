//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Outcome structs for the transactional lifecycle operations

pub mod question_answer;
pub mod room;
pub mod round;
pub mod round_completion;
pub mod session;
pub mod status;
