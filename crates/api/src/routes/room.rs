//! Route definitions for rooms and room-scoped sub-resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{room, session};
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET    /                       list
/// POST   /                       create
/// GET    /{id}                   get_by_id
/// PUT    /{id}                   update
/// DELETE /{id}                   delete
/// GET    /{id}/resume            get_resume
/// PUT    /{id}/resume            put_resume
/// GET    /{id}/sessions          list sessions
/// POST   /{id}/sessions          create session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(room::list).post(room::create))
        .route(
            "/{id}",
            get(room::get_by_id).put(room::update).delete(room::delete),
        )
        .route("/{id}/resume", get(room::get_resume).put(room::put_resume))
        .route(
            "/{id}/sessions",
            get(session::list_by_room).post(session::create),
        )
}
