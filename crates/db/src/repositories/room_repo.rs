//! Repository for the `rooms` table.

use parley_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::room::{CreateRoom, Room, UpdateRoom};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, memory_id, jd_id, created_at, updated_at";

/// Default display name when the client does not supply one.
const DEFAULT_NAME: &str = "Interview room";

/// Provides CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room, returning the created row.
    ///
    /// Generates the room id and derives the external memory-service
    /// identifier from its first eight hex characters.
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> Result<Room, sqlx::Error> {
        let id = Uuid::new_v4();
        let memory_id = format!("memory_{}", &id.simple().to_string()[..8]);
        let query = format!(
            "INSERT INTO rooms (id, name, memory_id)
             VALUES ($1, COALESCE($2, $3), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(DEFAULT_NAME)
            .bind(&memory_id)
            .fetch_one(pool)
            .await
    }

    /// Find a room by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rooms, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms ORDER BY created_at DESC");
        sqlx::query_as::<_, Room>(&query).fetch_all(pool).await
    }

    /// Update a room's name and/or JD reference. Only non-`None` fields in
    /// `input` are applied. Returns `None` if no row with the given `id`
    /// exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET
                name = COALESCE($2, name),
                jd_id = COALESCE($3, jd_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.jd_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a room by ID. Sessions, rounds, question answers, and
    /// completions cascade at the schema level. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate counts for the room detail endpoint: number of sessions
    /// and total rounds across those sessions.
    pub async fn counts(pool: &PgPool, id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM sessions WHERE room_id = $1),
                (SELECT COUNT(*) FROM rounds r
                 JOIN sessions s ON r.session_id = s.id
                 WHERE s.room_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
