//! Handlers for interview rooms and their resume bundle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parley_core::error::CoreError;
use parley_core::object_paths;
use parley_core::types::DbId;
use parley_db::models::room::{CreateRoom, RoomDetail, UpdateRoom};
use parley_db::repositories::RoomRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/rooms
///
/// Create a room. The name defaults server-side when omitted.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRoom>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let room = RoomRepo::create(&state.pool, &input).await?;

    tracing::info!(room_id = %room.id, memory_id = %room.memory_id, "Room created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// GET /api/v1/rooms
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rooms = RoomRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/rooms/{id}
///
/// Room detail with session and round counts.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let room = RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    let (sessions_count, rounds_count) = RoomRepo::counts(&state.pool, room_id).await?;

    Ok(Json(DataResponse {
        data: RoomDetail {
            room,
            sessions_count,
            rounds_count,
        },
    }))
}

/// PUT /api/v1/rooms/{id}
///
/// Update a room's name and/or job-description reference.
pub async fn update(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<UpdateRoom>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let updated = RoomRepo::update(&state.pool, room_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    tracing::info!(room_id = %room_id, "Room updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/rooms/{id}
///
/// Delete a room. Sessions, rounds, and question answers cascade.
pub async fn delete(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = RoomRepo::delete(&state.pool, room_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }));
    }

    tracing::info!(room_id = %room_id, "Room deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/rooms/{id}/resume
///
/// Store the parsed resume document for a room. Question generation reads
/// it back when a round is generated.
pub async fn put_resume(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(resume): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    if resume.is_null() {
        return Err(AppError::Core(CoreError::Validation(
            "resume document must not be null".into(),
        )));
    }

    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    let path = object_paths::resume_path(room_id);
    state.bundle_store.put_json(&path, &resume).await?;

    tracing::info!(room_id = %room_id, %path, "Resume stored");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/rooms/{id}/resume
pub async fn get_resume(
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    RoomRepo::find_by_id(&state.pool, room_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Room",
            id: room_id,
        }))?;

    let resume = state
        .bundle_store
        .get_json(&object_paths::resume_path(room_id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resume",
            id: room_id,
        }))?;

    Ok(Json(DataResponse { data: resume }))
}
