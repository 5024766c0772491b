//! Repository for the `sessions` table.

use parley_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, name, status, created_at, updated_at";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session under a room, returning the created row.
    ///
    /// When no name is supplied, defaults to "Interview session N" where N
    /// is the room's session count plus one. Fails with a foreign-key error
    /// if the room does not exist; callers check room existence first to
    /// surface a proper NotFound.
    pub async fn create(
        pool: &PgPool,
        room_id: DbId,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (id, room_id, name)
             VALUES ($1, $2, COALESCE($3,
                 'Interview session ' ||
                 ((SELECT COUNT(*) FROM sessions WHERE room_id = $2) + 1)::text))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(Uuid::new_v4())
            .bind(room_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sessions for a room, newest first.
    pub async fn list_by_room(pool: &PgPool, room_id: DbId) -> Result<Vec<Session>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sessions WHERE room_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Session>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a session by ID. Rounds and question answers cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate counts for the session detail endpoint: number of rounds
    /// and total questions across those rounds.
    pub async fn counts(pool: &PgPool, id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM rounds WHERE session_id = $1),
                (SELECT COALESCE(SUM(questions_count), 0)::bigint
                 FROM rounds WHERE session_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
