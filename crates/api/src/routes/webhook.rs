//! Route definitions for externally delivered webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::completion;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /round-complete     round_complete (HMAC-signed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/round-complete", post(completion::round_complete))
}
