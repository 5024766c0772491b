//! Repository for the `rounds` table.

use parley_core::object_paths;
use parley_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::round::{NewQuestion, Round};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, round_index, questions_count, bundle_path, \
    round_type, current_question_index, status, created_at, updated_at";

/// Attempts before giving up when concurrent creations race on the same
/// round index.
const MAX_INDEX_RETRIES: u32 = 3;

/// Provides operations for rounds and their bulk-created question rows.
pub struct RoundRepo;

impl RoundRepo {
    /// Create a round with its question rows in one transaction.
    ///
    /// The round index is the session's current round count, so indices are
    /// assigned sequentially and stay dense. Concurrent creations for the
    /// same session serialize through the `uq_rounds_session_round_index`
    /// constraint: the loser retries with a fresh count.
    ///
    /// One `question_answers` row is inserted per question with indices
    /// `0..N-1` and `is_answered = false`.
    pub async fn create_with_questions(
        pool: &PgPool,
        room_id: DbId,
        session_id: DbId,
        questions: &[NewQuestion],
        round_type: &str,
    ) -> Result<Round, sqlx::Error> {
        let mut attempt = 0;
        loop {
            match Self::try_create(pool, room_id, session_id, questions, round_type).await {
                Ok(round) => return Ok(round),
                Err(err) if is_round_index_conflict(&err) && attempt + 1 < MAX_INDEX_RETRIES => {
                    attempt += 1;
                    tracing::debug!(
                        %session_id,
                        attempt,
                        "Round index conflict with concurrent creation, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_create(
        pool: &PgPool,
        room_id: DbId,
        session_id: DbId,
        questions: &[NewQuestion],
        round_type: &str,
    ) -> Result<Round, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM rounds WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(&mut *tx)
                .await?;
        let round_index = count as i32;
        let bundle_path = object_paths::questions_path(room_id, session_id, round_index);

        let insert_round = format!(
            "INSERT INTO rounds
                (id, session_id, round_index, questions_count, bundle_path, round_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let round = sqlx::query_as::<_, Round>(&insert_round)
            .bind(Uuid::new_v4())
            .bind(session_id)
            .bind(round_index)
            .bind(questions.len() as i32)
            .bind(&bundle_path)
            .bind(round_type)
            .fetch_one(&mut *tx)
            .await?;

        let texts: Vec<String> = questions.iter().map(|q| q.text.clone()).collect();
        let categories: Vec<Option<String>> =
            questions.iter().map(|q| q.category.clone()).collect();

        sqlx::query(
            "INSERT INTO question_answers
                (id, round_id, question_index, question_text, question_category)
             SELECT gen_random_uuid(), $1, (q.ord - 1)::int, q.text, q.category
             FROM UNNEST($2::text[], $3::text[]) WITH ORDINALITY
                  AS q(text, category, ord)",
        )
        .bind(round.id)
        .bind(&texts)
        .bind(&categories)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(round)
    }

    /// Find a round by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Round>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rounds WHERE id = $1");
        sqlx::query_as::<_, Round>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rounds for a session ordered by round index.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Round>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM rounds WHERE session_id = $1 ORDER BY round_index");
        sqlx::query_as::<_, Round>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Find the round at a given index within a session.
    pub async fn find_by_session_and_index(
        pool: &PgPool,
        session_id: DbId,
        round_index: i32,
    ) -> Result<Option<Round>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM rounds WHERE session_id = $1 AND round_index = $2");
        sqlx::query_as::<_, Round>(&query)
            .bind(session_id)
            .bind(round_index)
            .fetch_optional(pool)
            .await
    }
}

/// True when `err` is a unique violation on the session/round-index
/// constraint, i.e. a concurrent creation won this index.
fn is_round_index_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_rounds_session_round_index")
        }
        _ => false,
    }
}
