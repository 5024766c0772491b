//! Room model and DTOs. A room is a named interview space grouping sessions.

use parley_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub name: String,
    /// Identifier of the room's external memory-service store.
    pub memory_id: String,
    /// Optional reference to a job description uploaded to the memory service.
    pub jd_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a room. The name defaults server-side when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// DTO for updating a room. Only non-`None` fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoom {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub jd_id: Option<String>,
}

/// Room plus aggregate counts, returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    pub sessions_count: i64,
    pub rounds_count: i64,
}
