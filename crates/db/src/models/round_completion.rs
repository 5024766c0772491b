//! Round-completion ledger model.
//!
//! A `RoundCompletion` records that an external orchestrator confirmed the
//! finalized QA transcript for one `(session, round_index)` pair. It is a
//! side-channel ledger keyed by the caller's idempotency key, not part of
//! the round's primary lifecycle data.

use parley_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `round_completions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoundCompletion {
    pub id: DbId,
    pub session_id: DbId,
    pub round_index: i32,
    pub idempotency_key: String,
    pub qa_object: serde_json::Value,
    pub occurred_at: Timestamp,
    pub created_at: Timestamp,
}

/// Validated input for recording a completion.
#[derive(Debug, Clone)]
pub struct NewRoundCompletion {
    pub session_id: DbId,
    pub round_index: i32,
    pub idempotency_key: String,
    pub qa_object: serde_json::Value,
    pub occurred_at: Timestamp,
}

/// Result of the atomic record-completion transaction.
#[derive(Debug)]
pub struct CompletionOutcome {
    pub completion: RoundCompletion,
    /// True when a matching completion already existed and no writes were
    /// performed.
    pub already_processed: bool,
    /// True when this call transitioned the owning session to `completed`.
    pub session_completed: bool,
}
