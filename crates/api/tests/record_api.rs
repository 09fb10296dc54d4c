//! HTTP-level integration tests for the record head endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router,
//! backed by the in-memory version store.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, clinician_token, create_record, delete, get, post_json, put_json, staff_token,
    test_app, token_for,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_record_returns_201_at_version_one() {
    let (app, _store) = test_app();
    let response = post_json(
        app,
        "/api/v1/records",
        &clinician_token(),
        json!({ "payload": { "intake": { "q1": "yes" } } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_version"], 1);
    assert_eq!(json["data"]["created_by"], "dr-okafor");
    assert_eq!(json["data"]["payload"]["intake"]["q1"], "yes");
}

#[tokio::test]
async fn create_record_without_token_is_401() {
    let (app, _store) = test_app();
    let response = common::send(
        app,
        Method::POST,
        "/api/v1/records",
        None,
        Some(json!({ "payload": {} })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn token_with_blank_subject_is_401() {
    let (app, _store) = test_app();
    let response = post_json(
        app,
        "/api/v1/records",
        &token_for("   ", "clinician"),
        json!({ "payload": {} }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_record_rejects_non_object_payload() {
    let (app, _store) = test_app();
    let response = post_json(
        app,
        "/api/v1/records",
        &clinician_token(),
        json!({ "payload": [1, 2, 3] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_unknown_record_is_404() {
    let (app, _store) = test_app();
    let response = get(app, "/api/v1/records/9999", &clinician_token()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_advances_version_and_snapshots_previous_state() {
    let (app, store) = test_app();
    let token = clinician_token();
    let id = create_record(&app, &token, json!({ "q1": 0 })).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/records/{id}"),
        &token,
        json!({ "payload": { "q1": 1 }, "change_notes": "Patient corrected answer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_version"], 2);
    assert_eq!(json["data"]["payload"]["q1"], 1);

    assert_eq!(store.snapshot_count(id).await, 1);

    let versions = body_json(get(app, &format!("/api/v1/records/{id}/versions"), &token).await).await;
    assert_eq!(versions["data"][0]["version"], 1);
    assert_eq!(versions["data"][0]["change_notes"], "Patient corrected answer");
    assert_eq!(versions["data"][0]["changed_by"], "dr-okafor");
}

#[tokio::test]
async fn staff_can_update_records() {
    let (app, _store) = test_app();
    let id = create_record(&app, &staff_token(), json!({ "q1": 0 })).await;

    let response = put_json(
        app,
        &format!("/api/v1/records/{id}"),
        &staff_token(),
        json!({ "payload": { "q1": 1 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_with_stale_expected_version_is_409() {
    let (app, _store) = test_app();
    let token = clinician_token();
    let id = create_record(&app, &token, json!({ "q1": 0 })).await;
    common::update_record(&app, &token, id, json!({ "q1": 1 })).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/records/{id}"),
        &token,
        json!({ "payload": { "q1": 2 }, "expected_version": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let head = body_json(get(app, &format!("/api/v1/records/{id}"), &token).await).await;
    assert_eq!(head["data"]["current_version"], 2);
}

#[tokio::test]
async fn update_survives_snapshot_write_failure() {
    let (app, store) = test_app();
    let token = clinician_token();
    let id = create_record(&app, &token, json!({ "q1": 0 })).await;

    store.fail_snapshot_writes(true);
    let json = common::update_record(&app, &token, id, json!({ "q1": 1 })).await;
    assert_eq!(json["data"]["current_version"], 2);

    let versions = body_json(get(app, &format!("/api/v1/records/{id}/versions"), &token).await).await;
    assert_eq!(versions["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_hides_record_but_keeps_history() {
    let (app, _store) = test_app();
    let token = clinician_token();
    let id = create_record(&app, &token, json!({ "q1": 0 })).await;
    common::update_record(&app, &token, id, json!({ "q1": 1 })).await;

    let response = delete(app.clone(), &format!("/api/v1/records/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/records/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app.clone(), &format!("/api/v1/records/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let versions = body_json(get(app, &format!("/api/v1/records/{id}/versions"), &token).await).await;
    assert_eq!(versions["data"].as_array().unwrap().len(), 1);
}
