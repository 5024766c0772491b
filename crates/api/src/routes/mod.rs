pub mod health;
pub mod question;
pub mod room;
pub mod round;
pub mod session;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rooms                                    list, create
/// /rooms/{id}                               get, update, delete
/// /rooms/{id}/resume                        get, put
/// /rooms/{id}/sessions                      list, create
///
/// /sessions/{id}                            get, delete
/// /sessions/{id}/completions                completion ledger (GET)
/// /sessions/{id}/rounds                     list, create
/// /sessions/{id}/rounds/generate            generate from resume (POST)
/// /sessions/{id}/rounds/{index}/analysis    finalized QA bundle (GET)
///
/// /rounds/{id}                              get
/// /rounds/{id}/questions                    list questions
/// /rounds/{id}/current-question             next unanswered question
///
/// /questions/{id}/answer                           record answer (POST)
///
/// /webhooks/round-complete                         completion webhook (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Rooms (also nests room-scoped sessions).
        .nest("/rooms", room::router())
        // Sessions (also nests session-scoped rounds).
        .nest("/sessions", session::router())
        // Round detail and question access.
        .nest("/rounds", round::router())
        // Answer recording.
        .nest("/questions", question::router())
        // External completion notifications.
        .nest("/webhooks", webhook::router())
}
