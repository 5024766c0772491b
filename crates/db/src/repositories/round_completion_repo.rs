//! Repository for the `round_completions` ledger.

use parley_core::types::DbId;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::models::round_completion::{CompletionOutcome, NewRoundCompletion, RoundCompletion};
use crate::models::status::lifecycle;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, session_id, round_index, idempotency_key, qa_object, occurred_at, created_at";

/// Provides idempotent recording of externally confirmed round completions.
pub struct RoundCompletionRepo;

impl RoundCompletionRepo {
    /// Find a completion matching either the idempotency key or the
    /// `(session, round_index)` pair. Either match means the event was
    /// already processed.
    pub async fn find_existing<'e, E>(
        executor: E,
        idempotency_key: &str,
        session_id: DbId,
        round_index: i32,
    ) -> Result<Option<RoundCompletion>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM round_completions
             WHERE idempotency_key = $1 OR (session_id = $2 AND round_index = $3)
             LIMIT 1"
        );
        sqlx::query_as::<_, RoundCompletion>(&query)
            .bind(idempotency_key)
            .bind(session_id)
            .bind(round_index)
            .fetch_optional(executor)
            .await
    }

    /// Record a completion exactly once and cascade the status updates.
    ///
    /// In one transaction:
    /// 1. An existing completion matching the idempotency key OR the
    ///    `(session, round_index)` pair short-circuits to
    ///    `already_processed = true` with no writes.
    /// 2. Otherwise the ledger row is inserted with `ON CONFLICT DO
    ///    NOTHING`; losing a concurrent race is detected by the missing
    ///    returned row and resolved by re-reading the winner.
    /// 3. The round is marked `completed` if not already, and the session
    ///    is marked `completed` when no non-completed rounds remain.
    ///
    /// The tri-write (ledger insert, round update, session update) commits
    /// or rolls back as a unit.
    pub async fn record(
        pool: &PgPool,
        input: &NewRoundCompletion,
    ) -> Result<CompletionOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(existing) = Self::find_existing(
            &mut *tx,
            &input.idempotency_key,
            input.session_id,
            input.round_index,
        )
        .await?
        {
            return Ok(CompletionOutcome {
                completion: existing,
                already_processed: true,
                session_completed: false,
            });
        }

        let insert = format!(
            "INSERT INTO round_completions
                (id, session_id, round_index, idempotency_key, qa_object, occurred_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, RoundCompletion>(&insert)
            .bind(Uuid::new_v4())
            .bind(input.session_id)
            .bind(input.round_index)
            .bind(&input.idempotency_key)
            .bind(&input.qa_object)
            .bind(input.occurred_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(completion) = inserted else {
            // A concurrent delivery won the insert race and has committed
            // (ON CONFLICT only skips over committed conflicting rows).
            drop(tx);
            let existing = Self::find_existing(
                pool,
                &input.idempotency_key,
                input.session_id,
                input.round_index,
            )
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
            return Ok(CompletionOutcome {
                completion: existing,
                already_processed: true,
                session_completed: false,
            });
        };

        sqlx::query(
            "UPDATE rounds SET status = $3, updated_at = NOW()
             WHERE session_id = $1 AND round_index = $2 AND status <> $3",
        )
        .bind(input.session_id)
        .bind(input.round_index)
        .bind(lifecycle::COMPLETED)
        .execute(&mut *tx)
        .await?;

        let (open_rounds,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM rounds WHERE session_id = $1 AND status <> $2",
        )
        .bind(input.session_id)
        .bind(lifecycle::COMPLETED)
        .fetch_one(&mut *tx)
        .await?;

        let mut session_completed = false;
        if open_rounds == 0 {
            let result = sqlx::query(
                "UPDATE sessions SET status = $2, updated_at = NOW()
                 WHERE id = $1 AND status <> $2",
            )
            .bind(input.session_id)
            .bind(lifecycle::COMPLETED)
            .execute(&mut *tx)
            .await?;
            session_completed = result.rows_affected() > 0;
        }

        tx.commit().await?;

        Ok(CompletionOutcome {
            completion,
            already_processed: false,
            session_completed,
        })
    }

    /// List completions for a session ordered by round index.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<RoundCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM round_completions
             WHERE session_id = $1 ORDER BY round_index"
        );
        sqlx::query_as::<_, RoundCompletion>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
