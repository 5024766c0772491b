//! Question/answer pair model and lifecycle outcome DTOs.

use parley_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `question_answers` table. Created in bulk when a round is
/// generated; mutated once when the candidate answers; never deleted
/// individually.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionAnswer {
    pub id: DbId,
    pub round_id: DbId,
    /// Dense from 0 within the round.
    pub question_index: i32,
    pub question_text: String,
    pub question_category: Option<String>,
    pub answer_text: Option<String>,
    pub is_answered: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an answer.
#[derive(Debug, Deserialize)]
pub struct SaveAnswer {
    pub answer_text: String,
}

/// Result of a `save_answer` transaction.
#[derive(Debug, Serialize)]
pub struct AnswerOutcome {
    pub round_id: DbId,
    pub session_id: DbId,
    pub is_round_completed: bool,
    /// True when this answer also completed the owning session.
    pub is_session_completed: bool,
    pub remaining_questions: i64,
}
