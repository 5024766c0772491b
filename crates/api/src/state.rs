use std::sync::Arc;

use parley_clients::{BundleStore, QuestionGenerator};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parley_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object store holding resume, question, and analysis bundles.
    pub bundle_store: Arc<dyn BundleStore>,
    /// Interview question generator.
    pub question_generator: Arc<dyn QuestionGenerator>,
}
