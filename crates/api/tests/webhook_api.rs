//! HTTP-level tests for the round-completion webhook: signature
//! enforcement, check ordering, idempotent replay, and the session
//! completion cascade.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, get, post_json, post_signed, post_unsigned, sign};
use sqlx::PgPool;

const WEBHOOK_PATH: &str = "/api/v1/webhooks/round-complete";

async fn seed_session_with_rounds(app: Router, rounds: usize) -> (String, String) {
    let room = body_json(post_json(app.clone(), "/api/v1/rooms", serde_json::json!({})).await)
        .await;
    let room_id = room["data"]["id"].as_str().unwrap().to_string();

    let session = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/rooms/{room_id}/sessions"),
            serde_json::json!({}),
        )
        .await,
    )
    .await;
    let session_id = session["data"]["id"].as_str().unwrap().to_string();

    for _ in 0..rounds {
        post_json(
            app.clone(),
            &format!("/api/v1/sessions/{session_id}/rounds"),
            serde_json::json!({"questions": [{"text": "Q?"}]}),
        )
        .await;
    }

    (room_id, session_id)
}

fn payload(room_id: &str, session_id: &str, round_index: i64, key: &str) -> serde_json::Value {
    serde_json::json!({
        "room_id": room_id,
        "session_id": session_id,
        "round_index": round_index,
        "qa_object": {"qa_pairs": [{"question": "Q?", "answer": "A"}]},
        "occurred_at": "2025-06-01T12:00:00Z",
        "idempotency_key": key,
    })
}

async fn deliver(app: Router, body: &serde_json::Value) -> axum::response::Response {
    let bytes = serde_json::to_vec(body).unwrap();
    let signature = sign(WEBHOOK_PATH, &bytes);
    post_signed(app, WEBHOOK_PATH, bytes, &signature).await
}

// ---------------------------------------------------------------------------
// Happy path and cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signed_delivery_completes_the_round(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 2).await;

    let response = deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["already_processed"], false);
    assert_eq!(json["data"]["session_completed"], false);
    assert_eq!(json["data"]["round_index"], 0);

    // Round 0 is completed, the session still active.
    let rounds =
        body_json(get(app.clone(), &format!("/api/v1/sessions/{session_id}/rounds")).await)
            .await;
    assert_eq!(rounds["data"][0]["status"], "completed");
    assert_eq!(rounds["data"][1]["status"], "active");

    let session = body_json(get(app, &format!("/api/v1/sessions/{session_id}")).await).await;
    assert_eq!(session["data"]["status"], "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn final_round_delivery_completes_the_session(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 2).await;

    deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-1")).await;
    let response = deliver(app.clone(), &payload(&room_id, &session_id, 1, "evt-2")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["session_completed"], true);

    let session = body_json(get(app.clone(), &format!("/api/v1/sessions/{session_id}")).await)
        .await;
    assert_eq!(session["data"]["status"], "completed");

    // The ledger lists both completions in round order.
    let completions = body_json(
        get(app, &format!("/api/v1/sessions/{session_id}/completions")).await,
    )
    .await;
    let items = completions["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["round_index"], 0);
    assert_eq!(items[1]["round_index"], 1);
}

// ---------------------------------------------------------------------------
// Idempotency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn replayed_delivery_is_a_no_op(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let first = body_json(
        deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-1")).await,
    )
    .await;

    let replay = deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-1")).await;
    assert_eq!(replay.status(), StatusCode::OK);
    let replay = body_json(replay).await;
    assert_eq!(replay["data"]["already_processed"], true);
    assert_eq!(replay["data"]["completion_id"], first["data"]["completion_id"]);

    let completions = body_json(
        get(app, &format!("/api/v1/sessions/{session_id}/completions")).await,
    )
    .await;
    assert_eq!(completions["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn different_key_for_a_completed_round_short_circuits(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let first = body_json(
        deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-1")).await,
    )
    .await;

    let retry = body_json(
        deliver(app.clone(), &payload(&room_id, &session_id, 0, "evt-other")).await,
    )
    .await;
    assert_eq!(retry["data"]["already_processed"], true);
    assert_eq!(retry["data"]["completion_id"], first["data"]["completion_id"]);

    let completions = body_json(
        get(app, &format!("/api/v1/sessions/{session_id}/completions")).await,
    )
    .await;
    assert_eq!(completions["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tampered_body_is_rejected(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let original = serde_json::to_vec(&payload(&room_id, &session_id, 0, "evt-1")).unwrap();
    let signature = sign(WEBHOOK_PATH, &original);

    let tampered = serde_json::to_vec(&payload(&room_id, &session_id, 0, "evt-2")).unwrap();
    let response = post_signed(app, WEBHOOK_PATH, tampered, &signature).await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_signature_header_is_rejected(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let body = serde_json::to_vec(&payload(&room_id, &session_id, 0, "evt-1")).unwrap();
    let response = post_unsigned(app, WEBHOOK_PATH, body).await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_signature_is_rejected(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let body = serde_json::to_vec(&payload(&room_id, &session_id, 0, "evt-1")).unwrap();
    let response = post_signed(app, WEBHOOK_PATH, body, "not-hex-at-all").await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signature_over_the_wrong_method_is_rejected(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    // The method participates in the signed bytes, so a signature computed
    // over GET must not authenticate a POST delivery.
    let body = serde_json::to_vec(&payload(&room_id, &session_id, 0, "evt-1")).unwrap();
    let signature = parley_core::signing::compute_signature(
        common::TEST_WEBHOOK_SECRET,
        "GET",
        WEBHOOK_PATH,
        &body,
    );
    let response = post_signed(app, WEBHOOK_PATH, body, &signature).await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_secret_configuration_rejects_valid_signatures(pool: PgPool) {
    let app = common::build_test_app_without_secret(pool);

    let body = serde_json::to_vec(&payload(
        &uuid::Uuid::new_v4().to_string(),
        &uuid::Uuid::new_v4().to_string(),
        0,
        "evt-1",
    ))
    .unwrap();
    let signature = sign(WEBHOOK_PATH, &body);
    let response = post_signed(app, WEBHOOK_PATH, body, &signature).await;
    common::assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Check ordering and cross-reference failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn validation_takes_precedence_over_authentication(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    // Payload missing qa_object, delivered with a garbage signature: the
    // response must be the validation error, not the auth error.
    let mut bad = payload(&room_id, &session_id, 0, "evt-1");
    bad.as_object_mut().unwrap().remove("qa_object");

    let bytes = serde_json::to_vec(&bad).unwrap();
    let response = post_signed(app, WEBHOOK_PATH, bytes, "deadbeef").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("qa_object"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_payload_problems_are_reported_at_once(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let bad = serde_json::json!({"round_index": -3});
    let bytes = serde_json::to_vec(&bad).unwrap();
    let signature = sign(WEBHOOK_PATH, &bytes);
    let response = post_signed(app, WEBHOOK_PATH, bytes, &signature).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    for field in ["room_id", "session_id", "round_index", "qa_object", "idempotency_key"] {
        assert!(message.contains(field), "expected {field} in: {message}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_session_returns_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let body = payload(
        &uuid::Uuid::new_v4().to_string(),
        &uuid::Uuid::new_v4().to_string(),
        0,
        "evt-1",
    );
    let response = deliver(app, &body).await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn room_mismatch_is_a_validation_error(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (_, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let wrong_room = uuid::Uuid::new_v4().to_string();
    let response = deliver(app, &payload(&wrong_room, &session_id, 0, "evt-1")).await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_round_index_returns_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let (room_id, session_id) = seed_session_with_rounds(app.clone(), 1).await;

    let response = deliver(app, &payload(&room_id, &session_id, 7, "evt-1")).await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
