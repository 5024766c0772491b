//! Route definitions for round detail and question access.

use axum::routing::get;
use axum::Router;

use crate::handlers::{question, round};
use crate::state::AppState;

/// Routes mounted at `/rounds`.
///
/// ```text
/// GET /{id}                      get_by_id
/// GET /{id}/questions            list questions
/// GET /{id}/current-question     next unanswered question
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(round::get_by_id))
        .route("/{id}/questions", get(question::list_by_round))
        .route("/{id}/current-question", get(question::current_question))
}
