//! Handlers for question/answer pairs: listing, the current-question
//! cursor, and the answer flow that drives round and session completion.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use parley_core::error::CoreError;
use parley_core::object_paths;
use parley_core::types::DbId;
use parley_db::models::question_answer::SaveAnswer;
use parley_db::repositories::{QuestionAnswerRepo, RoundRepo, SessionRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rounds/{round_id}/questions
pub async fn list_by_round(
    State(state): State<AppState>,
    Path(round_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    RoundRepo::find_by_id(&state.pool, round_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Round",
            id: round_id,
        }))?;

    let questions = QuestionAnswerRepo::list_by_round(&state.pool, round_id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// Payload for the current-question endpoint. `question` is `None` once
/// every question in the round is answered.
#[derive(Debug, Serialize)]
pub struct CurrentQuestionResponse {
    pub round_id: DbId,
    pub question: Option<parley_db::models::question_answer::QuestionAnswer>,
    pub has_more_questions: bool,
}

/// GET /api/v1/rounds/{round_id}/current-question
///
/// The question the candidate should answer next. Prefers the round's
/// cursor position, falling back to the lowest unanswered index.
pub async fn current_question(
    State(state): State<AppState>,
    Path(round_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let round = RoundRepo::find_by_id(&state.pool, round_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Round",
            id: round_id,
        }))?;

    let question = QuestionAnswerRepo::current_question(&state.pool, &round).await?;
    let has_more_questions = question.is_some();

    Ok(Json(DataResponse {
        data: CurrentQuestionResponse {
            round_id,
            question,
            has_more_questions,
        },
    }))
}

/// POST /api/v1/questions/{id}/answer
///
/// Record an answer. When this answer completes the round, the finalized
/// QA bundle is written to the object store for the external orchestrator
/// to pick up.
pub async fn save_answer(
    State(state): State<AppState>,
    Path(qa_id): Path<DbId>,
    Json(input): Json<SaveAnswer>,
) -> AppResult<impl IntoResponse> {
    if input.answer_text.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "answer_text must not be empty".into(),
        )));
    }

    let outcome = QuestionAnswerRepo::save_answer(&state.pool, qa_id, &input.answer_text)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QuestionAnswer",
            id: qa_id,
        }))?;

    tracing::info!(
        qa_id = %qa_id,
        round_id = %outcome.round_id,
        remaining = outcome.remaining_questions,
        round_completed = outcome.is_round_completed,
        session_completed = outcome.is_session_completed,
        "Answer recorded",
    );

    // The bundle write happens after the transaction committed; the
    // completion webhook later confirms the bundle exists.
    if outcome.is_round_completed {
        store_qa_bundle(&state, outcome.round_id, outcome.session_id).await;
    }

    Ok(Json(DataResponse { data: outcome }))
}

/// Assemble and persist the completed round's QA transcript bundle.
///
/// Failures are logged and swallowed: the round is already completed in
/// the database, and the orchestrator retries missing bundles.
async fn store_qa_bundle(state: &AppState, round_id: DbId, session_id: DbId) {
    let result = async {
        let round = RoundRepo::find_by_id(&state.pool, round_id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("round {round_id} vanished")))?;
        let session = SessionRepo::find_by_id(&state.pool, session_id)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("session {session_id} vanished")))?;
        let qa_pairs = QuestionAnswerRepo::list_by_round(&state.pool, round_id).await?;

        let bundle = serde_json::json!({
            "round_info": {
                "round_id": round.id,
                "round_index": round.round_index,
                "questions_count": round.questions_count,
                "round_type": round.round_type,
            },
            "session_info": {
                "session_id": session.id,
                "room_id": session.room_id,
                "session_name": session.name,
            },
            "qa_pairs": qa_pairs
                .iter()
                .map(|qa| serde_json::json!({
                    "question_index": qa.question_index,
                    "question": qa.question_text,
                    "category": qa.question_category,
                    "answer": qa.answer_text,
                }))
                .collect::<Vec<_>>(),
            "analysis_ready": true,
            "metadata": {
                "completed_at": chrono::Utc::now().to_rfc3339(),
                "bundle_path": round.bundle_path,
            },
        });

        let path = object_paths::analysis_path(session.room_id, session_id, round.round_index);
        state.bundle_store.put_json(&path, &bundle).await?;
        tracing::info!(round_id = %round_id, %path, "QA bundle stored");
        Ok::<(), AppError>(())
    }
    .await;

    if let Err(err) = result {
        tracing::warn!(
            round_id = %round_id,
            session_id = %session_id,
            error = %err,
            "Failed to store QA bundle for completed round",
        );
    }
}
