//! Handlers for the record head: create, read, update, soft delete.
//!
//! Updates go through [`RecordState`], which snapshots the pre-image before
//! advancing the version.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formhist_core::types::{DbId, Payload, VersionNumber};
use formhist_history::{RecordState, RecordUpdate};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for `POST /records`.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub payload: Payload,
}

/// Request body for `PUT /records/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub payload: Payload,
    pub change_notes: Option<String>,
    /// When set, the update is rejected with 409 unless the record is still
    /// at this version.
    pub expected_version: Option<VersionNumber>,
}

// ---------------------------------------------------------------------------
// POST /records
// ---------------------------------------------------------------------------

pub async fn create_record(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateRecordRequest>,
) -> AppResult<impl IntoResponse> {
    let record = RecordState::create(state.store(), &user.actor, input.payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// GET /records/{id}
// ---------------------------------------------------------------------------

pub async fn get_record(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = RecordState::get(state.store(), id).await?;
    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// PUT /records/{id}
// ---------------------------------------------------------------------------

/// Replace the record payload. The superseded state is snapshotted first.
pub async fn update_record(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRecordRequest>,
) -> AppResult<impl IntoResponse> {
    let update = RecordUpdate {
        payload: input.payload,
        change_notes: input.change_notes,
        expected_version: input.expected_version,
    };
    let record = RecordState::update(state.store(), id, &user.actor, update).await?;
    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// DELETE /records/{id}
// ---------------------------------------------------------------------------

/// Soft-delete a record. Its snapshots are retained.
pub async fn delete_record(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    RecordState::delete(state.store(), id, &user.actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
