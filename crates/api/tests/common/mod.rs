//! Shared test harness: builds the production router over a test pool with
//! an in-memory bundle store and a canned question generator, plus small
//! request helpers driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parley_clients::{CannedGenerator, MemoryBundleStore};
use sqlx::PgPool;
use tower::ServiceExt;

use parley_api::config::{LlmConfig, ServerConfig, StorageConfig};
use parley_api::router::build_app_router;
use parley_api::state::AppState;

/// Webhook secret used by all signed test requests.
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        webhook_secret: Some(TEST_WEBHOOK_SECRET.to_string()),
        storage: StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            region: "us-east-1".to_string(),
            bucket: "parley-test".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
        },
        llm: LlmConfig {
            base_url: "http://localhost:8001/v1".to_string(),
            api_key: String::new(),
            model: "qwen-plus".to_string(),
            default_question_count: 3,
        },
    }
}

/// Build the production router over `pool`, returning the in-memory bundle
/// store alongside so tests can seed resumes and inspect written bundles.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<MemoryBundleStore>) {
    let config = test_config();
    let store = Arc::new(MemoryBundleStore::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        bundle_store: store.clone(),
        question_generator: Arc::new(CannedGenerator::with_placeholder_questions(5)),
    };

    (build_app_router(state, &config), store)
}

/// As [`build_test_app`] but with the webhook secret removed.
pub fn build_test_app_without_secret(pool: PgPool) -> Router {
    let mut config = test_config();
    config.webhook_secret = None;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        bundle_store: Arc::new(MemoryBundleStore::new()),
        question_generator: Arc::new(CannedGenerator::with_placeholder_questions(5)),
    };

    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST raw bytes with an arbitrary signature header value.
pub async fn post_signed(
    app: Router,
    uri: &str,
    body: Vec<u8>,
    signature: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-signature", signature)
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST raw bytes with no signature header at all.
pub async fn post_unsigned(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Compute a valid signature for a test webhook delivery.
pub fn sign(path: &str, body: &[u8]) -> String {
    parley_core::signing::compute_signature(TEST_WEBHOOK_SECRET, "POST", path, body)
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the response is an error with the given status and `code` field.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}
