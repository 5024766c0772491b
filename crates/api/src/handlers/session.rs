//! Handlers for interview sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parley_core::error::CoreError;
use parley_core::types::DbId;
use parley_db::models::session::{CreateSession, SessionDetail};
use parley_db::repositories::{RoomRepo, RoundCompletionRepo, SessionRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/rooms/{room_id}/sessions
///
/// Create a session under a room. The name defaults to "Interview session N".
pub async fn create(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<CreateSession>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    let session = SessionRepo::create(&state.pool, room_id, &input).await?;

    tracing::info!(session_id = %session.id, room_id = %room_id, "Session created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// GET /api/v1/rooms/{room_id}/sessions
pub async fn list_by_room(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    let sessions = SessionRepo::list_by_room(&state.pool, room_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/sessions/{id}
///
/// Session detail with round and question counts.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;

    let (rounds_count, questions_count) = SessionRepo::counts(&state.pool, session_id).await?;

    Ok(Json(DataResponse {
        data: SessionDetail {
            session,
            rounds_count,
            questions_count,
        },
    }))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = SessionRepo::delete(&state.pool, session_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }));
    }

    tracing::info!(session_id = %session_id, "Session deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/{id}/completions
///
/// The session's round-completion ledger, ordered by round index.
pub async fn list_completions(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    SessionRepo::find_by_id(&state.pool, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;

    let completions = RoundCompletionRepo::list_by_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: completions }))
}
