//! Route definitions for sessions and session-scoped rounds.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{round, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /{id}                             get_by_id
/// DELETE /{id}                             delete
/// GET    /{id}/completions                 list_completions
/// GET    /{id}/rounds                      list rounds
/// POST   /{id}/rounds                      create round (manual)
/// POST   /{id}/rounds/generate             generate round from resume
/// GET    /{id}/rounds/{index}/analysis     finalized QA bundle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(session::get_by_id).delete(session::delete))
        .route("/{id}/completions", get(session::list_completions))
        .route(
            "/{id}/rounds",
            get(round::list_by_session).post(round::create),
        )
        .route("/{id}/rounds/generate", post(round::generate))
        .route("/{id}/rounds/{index}/analysis", get(round::get_analysis))
}
