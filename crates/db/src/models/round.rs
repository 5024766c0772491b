//! Round model and DTOs. A round is one generated batch of questions.

use parley_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rounds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Round {
    pub id: DbId,
    pub session_id: DbId,
    /// Zero-based, dense per session: a session with N rounds has indices
    /// exactly {0..N-1}.
    pub round_index: i32,
    pub questions_count: i32,
    /// Object-store path of the externally persisted question bundle.
    pub bundle_path: String,
    /// `ai_generated` or `manual`.
    pub round_type: String,
    /// Cursor into `question_answers.question_index`. Monotonic, never
    /// decreases.
    pub current_question_index: i32,
    /// `active`, `completed`, or `paused`. `active -> completed` is one-way.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One question to seed into a new round.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub category: Option<String>,
}

/// DTO for creating a round with client-supplied questions.
#[derive(Debug, Deserialize)]
pub struct CreateRound {
    pub questions: Vec<NewQuestion>,
}
