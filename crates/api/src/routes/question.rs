//! Route definitions for answer recording.

use axum::routing::post;
use axum::Router;

use crate::handlers::question;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// POST /{id}/answer     save_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/answer", post(question::save_answer))
}
