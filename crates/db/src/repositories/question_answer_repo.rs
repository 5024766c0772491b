//! Repository for the `question_answers` table and the answer-recording
//! transaction.

use parley_core::types::DbId;
use sqlx::PgPool;

use crate::models::question_answer::{AnswerOutcome, QuestionAnswer};
use crate::models::round::Round;
use crate::models::status::lifecycle;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, round_id, question_index, question_text, question_category, \
    answer_text, is_answered, created_at, updated_at";

/// Provides question/answer operations.
pub struct QuestionAnswerRepo;

impl QuestionAnswerRepo {
    /// Find a question/answer pair by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QuestionAnswer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM question_answers WHERE id = $1");
        sqlx::query_as::<_, QuestionAnswer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all question/answer pairs for a round ordered by question index.
    pub async fn list_by_round(
        pool: &PgPool,
        round_id: DbId,
    ) -> Result<Vec<QuestionAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM question_answers
             WHERE round_id = $1 ORDER BY question_index"
        );
        sqlx::query_as::<_, QuestionAnswer>(&query)
            .bind(round_id)
            .fetch_all(pool)
            .await
    }

    /// The question the candidate should answer next, or `None` when every
    /// question in the round is answered (a normal terminal state).
    ///
    /// Prefers the question at the round's `current_question_index`; if that
    /// slot is already answered (out-of-order client retry), falls back to
    /// the lowest-indexed unanswered question.
    pub async fn current_question(
        pool: &PgPool,
        round: &Round,
    ) -> Result<Option<QuestionAnswer>, sqlx::Error> {
        let at_cursor = format!(
            "SELECT {COLUMNS} FROM question_answers
             WHERE round_id = $1 AND question_index = $2 AND is_answered = FALSE"
        );
        if let Some(qa) = sqlx::query_as::<_, QuestionAnswer>(&at_cursor)
            .bind(round.id)
            .bind(round.current_question_index)
            .fetch_optional(pool)
            .await?
        {
            return Ok(Some(qa));
        }

        let lowest_unanswered = format!(
            "SELECT {COLUMNS} FROM question_answers
             WHERE round_id = $1 AND is_answered = FALSE
             ORDER BY question_index LIMIT 1"
        );
        sqlx::query_as::<_, QuestionAnswer>(&lowest_unanswered)
            .bind(round.id)
            .fetch_optional(pool)
            .await
    }

    /// Record an answer and advance the round in one transaction.
    ///
    /// Returns `None` when no question/answer row with `qa_id` exists.
    /// Otherwise:
    /// - sets `answer_text` and `is_answered`,
    /// - advances `current_question_index` to `question_index + 1`
    ///   (monotonic; never decreases),
    /// - when no unanswered questions remain, flips the round to
    ///   `completed` and, if the session has no other non-completed rounds,
    ///   the session as well.
    ///
    /// The owning round row is locked `FOR UPDATE` before any read-modify-
    /// write so concurrent answers on the same round serialize and exactly
    /// one of them observes `remaining_questions == 0`.
    pub async fn save_answer(
        pool: &PgPool,
        qa_id: DbId,
        answer_text: &str,
    ) -> Result<Option<AnswerOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let target: Option<(DbId, i32)> = sqlx::query_as(
            "SELECT round_id, question_index FROM question_answers WHERE id = $1",
        )
        .bind(qa_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((round_id, question_index)) = target else {
            return Ok(None);
        };

        // Serialize concurrent save_answer calls on this round.
        let (session_id,): (DbId,) =
            sqlx::query_as("SELECT session_id FROM rounds WHERE id = $1 FOR UPDATE")
                .bind(round_id)
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query(
            "UPDATE question_answers
             SET answer_text = $2, is_answered = TRUE, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(qa_id)
        .bind(answer_text)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE rounds
             SET current_question_index = GREATEST(current_question_index, $2),
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(round_id)
        .bind(question_index + 1)
        .execute(&mut *tx)
        .await?;

        let (remaining,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM question_answers
             WHERE round_id = $1 AND is_answered = FALSE",
        )
        .bind(round_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut is_session_completed = false;
        if remaining == 0 {
            sqlx::query(
                "UPDATE rounds SET status = $2, updated_at = NOW()
                 WHERE id = $1 AND status <> $2",
            )
            .bind(round_id)
            .bind(lifecycle::COMPLETED)
            .execute(&mut *tx)
            .await?;

            let (open_rounds,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM rounds WHERE session_id = $1 AND status <> $2",
            )
            .bind(session_id)
            .bind(lifecycle::COMPLETED)
            .fetch_one(&mut *tx)
            .await?;

            if open_rounds == 0 {
                let result = sqlx::query(
                    "UPDATE sessions SET status = $2, updated_at = NOW()
                     WHERE id = $1 AND status <> $2",
                )
                .bind(session_id)
                .bind(lifecycle::COMPLETED)
                .execute(&mut *tx)
                .await?;
                is_session_completed = result.rows_affected() > 0;
            }
        }

        tx.commit().await?;

        Ok(Some(AnswerOutcome {
            round_id,
            session_id,
            is_round_completed: remaining == 0,
            is_session_completed,
            remaining_questions: remaining,
        }))
    }
}
