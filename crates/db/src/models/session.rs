//! Interview session model and DTOs.

use parley_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `sessions` table. One interview conversation in a room.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub room_id: DbId,
    pub name: String,
    /// `active`, `completed`, or `paused`. Transitions into `completed` are
    /// driven only by round completions, never by direct client request.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session. The name defaults to "Interview session N".
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSession {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// Session plus aggregate counts, returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub rounds_count: i64,
    pub questions_count: i64,
}
