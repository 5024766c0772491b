//! Handlers for interview rounds: manual creation, LLM-backed generation,
//! and retrieval of rounds and their finalized analysis bundles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parley_core::error::CoreError;
use parley_core::object_paths;
use parley_core::types::DbId;
use parley_db::models::round::{CreateRound, NewQuestion, Round};
use parley_db::models::session::Session;
use parley_db::models::status;
use parley_db::repositories::{RoundRepo, SessionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// DTO for generating a round from the room's resume.
#[derive(Debug, Deserialize)]
pub struct GenerateRound {
    /// Number of questions to generate; falls back to the configured
    /// default.
    pub count: Option<usize>,
}

/// POST /api/v1/sessions/{session_id}/rounds
///
/// Create a round from a client-supplied question list.
pub async fn create(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<CreateRound>,
) -> AppResult<impl IntoResponse> {
    if input.questions.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "questions must not be empty".into(),
        )));
    }
    if input.questions.iter().any(|q| q.text.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "every question must have non-empty text".into(),
        )));
    }

    let session = find_session(&state, session_id).await?;

    let round = RoundRepo::create_with_questions(
        &state.pool,
        session.room_id,
        session_id,
        &input.questions,
        status::round_type::MANUAL,
    )
    .await?;

    store_question_bundle(&state, &round, &input.questions).await;

    tracing::info!(
        round_id = %round.id,
        session_id = %session_id,
        round_index = round.round_index,
        questions = round.questions_count,
        "Round created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: round })))
}

/// POST /api/v1/sessions/{session_id}/rounds/generate
///
/// Generate a round of questions from the room's stored resume.
pub async fn generate(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<GenerateRound>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, session_id).await?;

    let resume = state
        .bundle_store
        .get_json(&object_paths::resume_path(session.room_id))
        .await?
        .ok_or(AppError::Core(CoreError::Validation(
            "no resume uploaded for this room; upload one before generating questions".into(),
        )))?;
    let resume_text = resume_as_text(&resume);

    let count = input
        .count
        .unwrap_or(state.config.llm.default_question_count);
    if count == 0 {
        return Err(AppError::Core(CoreError::Validation(
            "count must be at least 1".into(),
        )));
    }

    let generated = state.question_generator.generate(&resume_text, count).await?;
    let questions: Vec<NewQuestion> = generated
        .into_iter()
        .map(|q| NewQuestion {
            text: q.text,
            category: q.category,
        })
        .collect();

    let round = RoundRepo::create_with_questions(
        &state.pool,
        session.room_id,
        session_id,
        &questions,
        status::round_type::AI_GENERATED,
    )
    .await?;

    store_question_bundle(&state, &round, &questions).await;

    tracing::info!(
        round_id = %round.id,
        session_id = %session_id,
        round_index = round.round_index,
        questions = round.questions_count,
        "Round generated",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: round })))
}

/// GET /api/v1/sessions/{session_id}/rounds
pub async fn list_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_session(&state, session_id).await?;

    let rounds = RoundRepo::list_by_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: rounds }))
}

/// GET /api/v1/rounds/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(round_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let round = RoundRepo::find_by_id(&state.pool, round_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Round",
            id: round_id,
        }))?;

    Ok(Json(DataResponse { data: round }))
}

/// GET /api/v1/sessions/{session_id}/rounds/{round_index}/analysis
///
/// The finalized QA analysis bundle for one round, as stored by the
/// answer flow and confirmed by the completion webhook.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path((session_id, round_index)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, session_id).await?;

    RoundRepo::find_by_session_and_index(&state.pool, session_id, round_index)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Round {round_index} in session {session_id} not found"
            ))
        })?;

    let path = object_paths::analysis_path(session.room_id, session_id, round_index);
    let analysis = state
        .bundle_store
        .get_json(&path)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Analysis for round {round_index} in session {session_id} not available"
            ))
        })?;

    Ok(Json(DataResponse { data: analysis }))
}

/// Flatten a stored resume document into prompt text.
///
/// Plain-string documents and `{"text": ...}` wrappers pass through;
/// anything structured is pretty-printed for the model.
fn resume_as_text(resume: &serde_json::Value) -> String {
    match resume {
        serde_json::Value::String(s) => s.clone(),
        other => match other.get("text").and_then(|t| t.as_str()) {
            Some(text) => text.to_string(),
            None => serde_json::to_string_pretty(other).unwrap_or_default(),
        },
    }
}

async fn find_session(state: &AppState, session_id: DbId) -> AppResult<Session> {
    SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))
}

/// Persist the question bundle for a freshly created round.
///
/// The round row already carries `bundle_path`, so a store outage here
/// leaves the round usable; the failure is logged, not surfaced.
async fn store_question_bundle(state: &AppState, round: &Round, questions: &[NewQuestion]) {
    let bundle = serde_json::json!({
        "round_id": round.id,
        "session_id": round.session_id,
        "round_index": round.round_index,
        "round_type": round.round_type,
        "questions": questions
            .iter()
            .enumerate()
            .map(|(i, q)| serde_json::json!({
                "question_index": i,
                "text": q.text,
                "category": q.category,
            }))
            .collect::<Vec<_>>(),
    });

    if let Err(err) = state.bundle_store.put_json(&round.bundle_path, &bundle).await {
        tracing::warn!(
            round_id = %round.id,
            path = %round.bundle_path,
            error = %err,
            "Failed to store question bundle",
        );
    }
}
