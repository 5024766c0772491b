//! The round-completion webhook.
//!
//! An external orchestrator calls this endpoint once a round's finalized
//! QA transcript is stored. The handler's check ordering is a contract:
//! structural payload validation, then signature authentication, then
//! existence checks, then the idempotent atomic apply. Each earlier
//! failure preempts later checks, so a malformed payload is always
//! reported as a validation error even when the signature is also bad.

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use parley_core::error::CoreError;
use parley_core::signing;
use parley_core::types::DbId;
use parley_db::models::round_completion::NewRoundCompletion;
use parley_db::repositories::{RoundCompletionRepo, RoundRepo, SessionRepo};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 signature of `METHOD + PATH + BODY`.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Response payload for a processed (or replayed) completion delivery.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub completion_id: DbId,
    pub session_id: DbId,
    pub round_index: i32,
    /// True when this delivery matched an existing completion and no
    /// state was changed.
    pub already_processed: bool,
    /// True when this delivery transitioned the session to `completed`.
    pub session_completed: bool,
}

/// POST /api/v1/webhooks/round-complete
pub async fn round_complete(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    // 1. Structural validation, reporting every offending field at once.
    let payload = parse_payload(&body)?;

    // 2. Signature authentication over the raw request bytes.
    verify_request_signature(&state, &method, uri.path(), &headers, &body)?;

    // 3. Cross-reference checks, each a distinct failure.
    let session = SessionRepo::find_by_id(&state.pool, payload.session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: payload.session_id,
        }))?;

    if session.room_id != payload.room_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "session {} belongs to room {}, not room {}",
            session.id, session.room_id, payload.room_id
        ))));
    }

    RoundRepo::find_by_session_and_index(&state.pool, payload.session_id, payload.round_index)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Round {} in session {} not found",
                payload.round_index, payload.session_id
            ))
        })?;

    // 4. Idempotent atomic apply: ledger insert, round update, session
    //    cascade, all or nothing.
    let outcome = RoundCompletionRepo::record(
        &state.pool,
        &NewRoundCompletion {
            session_id: payload.session_id,
            round_index: payload.round_index,
            idempotency_key: payload.idempotency_key,
            qa_object: payload.qa_object,
            occurred_at: payload.occurred_at,
        },
    )
    .await?;

    tracing::info!(
        completion_id = %outcome.completion.id,
        session_id = %payload.session_id,
        round_index = payload.round_index,
        already_processed = outcome.already_processed,
        session_completed = outcome.session_completed,
        "Round completion processed",
    );

    Ok(Json(DataResponse {
        data: CompletionResponse {
            completion_id: outcome.completion.id,
            session_id: outcome.completion.session_id,
            round_index: outcome.completion.round_index,
            already_processed: outcome.already_processed,
            session_completed: outcome.session_completed,
        },
    }))
}

#[derive(Debug)]
struct CompletionPayload {
    room_id: DbId,
    session_id: DbId,
    round_index: i32,
    qa_object: serde_json::Value,
    occurred_at: DateTime<Utc>,
    idempotency_key: String,
}

/// Validate the raw body into a [`CompletionPayload`].
///
/// All offending fields are collected into one validation error rather
/// than failing on the first.
fn parse_payload(body: &[u8]) -> Result<CompletionPayload, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|err| {
        AppError::Core(CoreError::Validation(format!("body is not valid JSON: {err}")))
    })?;
    let Some(obj) = value.as_object() else {
        return Err(AppError::Core(CoreError::Validation(
            "body must be a JSON object".into(),
        )));
    };

    let mut problems: Vec<String> = Vec::new();

    let room_id = match obj.get("room_id").and_then(|v| v.as_str()) {
        Some(s) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                problems.push("room_id must be a valid UUID".into());
                None
            }
        },
        None => {
            problems.push("room_id is required and must be a string".into());
            None
        }
    };

    let session_id = match obj.get("session_id").and_then(|v| v.as_str()) {
        Some(s) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                problems.push("session_id must be a valid UUID".into());
                None
            }
        },
        None => {
            problems.push("session_id is required and must be a string".into());
            None
        }
    };

    let round_index = match obj.get("round_index").and_then(|v| v.as_i64()) {
        Some(i) if (0..=i64::from(i32::MAX)).contains(&i) => Some(i as i32),
        Some(_) => {
            problems.push("round_index must be a non-negative integer".into());
            None
        }
        None => {
            problems.push("round_index is required and must be an integer".into());
            None
        }
    };

    let qa_object = match obj.get("qa_object") {
        Some(v) if v.is_object() || v.is_array() => Some(v.clone()),
        Some(_) => {
            problems.push("qa_object must be a structured value, not a scalar".into());
            None
        }
        None => {
            problems.push("qa_object is required".into());
            None
        }
    };

    let occurred_at = match obj.get("occurred_at").and_then(|v| v.as_str()) {
        Some(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(_) => {
                problems.push("occurred_at must be an ISO-8601 timestamp".into());
                None
            }
        },
        None => {
            problems.push("occurred_at is required and must be a string".into());
            None
        }
    };

    let idempotency_key = match obj.get("idempotency_key").and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Some(s.to_string()),
        Some(_) => {
            problems.push("idempotency_key must not be empty".into());
            None
        }
        None => {
            problems.push("idempotency_key is required and must be a string".into());
            None
        }
    };

    if !problems.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid completion payload: {}",
            problems.join("; ")
        ))));
    }

    // All Somes by construction once `problems` is empty.
    Ok(CompletionPayload {
        room_id: room_id.ok_or_else(invalid_payload)?,
        session_id: session_id.ok_or_else(invalid_payload)?,
        round_index: round_index.ok_or_else(invalid_payload)?,
        qa_object: qa_object.ok_or_else(invalid_payload)?,
        occurred_at: occurred_at.ok_or_else(invalid_payload)?,
        idempotency_key: idempotency_key.ok_or_else(invalid_payload)?,
    })
}

fn invalid_payload() -> AppError {
    AppError::Core(CoreError::Validation("Invalid completion payload".into()))
}

/// Check the delivery's HMAC signature.
///
/// Missing secret configuration, missing header, and mismatch all fail
/// identically as `Unauthorized`. Expected and received signatures are
/// logged for audit; the secret never is.
fn verify_request_signature(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), AppError> {
    let unauthorized = || AppError::Core(CoreError::Unauthorized("Invalid signature".into()));

    let Some(secret) = state.config.webhook_secret.as_deref() else {
        tracing::error!("Webhook delivery rejected: no webhook secret configured");
        return Err(unauthorized());
    };

    let Some(received) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Webhook delivery rejected: missing {SIGNATURE_HEADER} header");
        return Err(unauthorized());
    };

    if !signing::verify_signature(secret, method.as_str(), path, body, received) {
        let expected = signing::compute_signature(secret, method.as_str(), path, body);
        tracing::warn!(%expected, %received, "Webhook delivery rejected: signature mismatch");
        return Err(unauthorized());
    }

    Ok(())
}
