//! Handlers for record history: listings, single versions, comparisons,
//! change ranges, restoration and lineage.
//!
//! Every endpoint here requires the `admin` or `clinician` role. Version
//! path segments and query parameters are parsed by hand so that
//! non-numeric and non-positive values produce the same 400 response.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use formhist_core::types::DbId;
use formhist_core::versioning::parse_version_param;
use formhist_history::{RestoreCoordinator, VersionReader};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireHistoryAccess;
use crate::query::VersionRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional request body for `POST /records/{id}/restore-version/{n}`.
#[derive(Debug, Default, Deserialize)]
pub struct RestoreVersionRequest {
    #[serde(default)]
    pub change_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /records/{id}/versions
// ---------------------------------------------------------------------------

pub async fn list_versions(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Path(record_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = VersionReader::list_versions(state.store(), record_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// GET /records/{id}/version/{n}
// ---------------------------------------------------------------------------

pub async fn get_version(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Path((record_id, raw_version)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let version = parse_version_param("version", Some(raw_version.as_str()))?;
    let view = VersionReader::get_version(state.store(), record_id, version).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// GET /records/{id}/version/{n}/lineage
// ---------------------------------------------------------------------------

/// The restoration chain starting at version `n`.
pub async fn version_lineage(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Path((record_id, raw_version)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let version = parse_version_param("version", Some(raw_version.as_str()))?;
    let chain = VersionReader::restoration_lineage(state.store(), record_id, version).await?;
    Ok(Json(DataResponse { data: chain }))
}

// ---------------------------------------------------------------------------
// GET /records/{id}/diff?v1=&v2=
// ---------------------------------------------------------------------------

/// Both versions side by side. The caller computes any field-level diff.
pub async fn diff_versions(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Path(record_id): Path<DbId>,
    Query(params): Query<VersionRangeParams>,
) -> AppResult<impl IntoResponse> {
    let v1 = parse_version_param("v1", params.v1.as_deref())?;
    let v2 = parse_version_param("v2", params.v2.as_deref())?;
    let comparison = VersionReader::compare_versions(state.store(), record_id, v1, v2).await?;
    Ok(Json(DataResponse { data: comparison }))
}

// ---------------------------------------------------------------------------
// GET /records/{id}/changes?v1=&v2=
// ---------------------------------------------------------------------------

pub async fn list_changes(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Path(record_id): Path<DbId>,
    Query(params): Query<VersionRangeParams>,
) -> AppResult<impl IntoResponse> {
    let v1 = parse_version_param("v1", params.v1.as_deref())?;
    let v2 = parse_version_param("v2", params.v2.as_deref())?;
    let changes = VersionReader::list_changes(state.store(), record_id, v1, v2).await?;
    Ok(Json(DataResponse { data: changes }))
}

// ---------------------------------------------------------------------------
// GET /records/{id}/restore-version/{n}
// ---------------------------------------------------------------------------

/// Preview a restoration: the target snapshot and the note that would be
/// recorded. Nothing is written.
pub async fn preview_restore(
    State(state): State<AppState>,
    RequireHistoryAccess(user): RequireHistoryAccess,
    Path((record_id, raw_version)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let target = parse_version_param("version", Some(raw_version.as_str()))?;
    let prepared =
        RestoreCoordinator::prepare_restore(state.store(), record_id, target, &user.actor).await?;
    Ok(Json(DataResponse { data: prepared }))
}

// ---------------------------------------------------------------------------
// POST /records/{id}/restore-version/{n}
// ---------------------------------------------------------------------------

/// Restore the record to the payload stored for version `n`. The restoration
/// is a new forward version; the replaced head is snapshotted as its audit
/// entry. The body may be omitted entirely.
pub async fn restore_version(
    State(state): State<AppState>,
    RequireHistoryAccess(user): RequireHistoryAccess,
    Path((record_id, raw_version)): Path<(DbId, String)>,
    body: Option<Json<RestoreVersionRequest>>,
) -> AppResult<impl IntoResponse> {
    let target = parse_version_param("version", Some(raw_version.as_str()))?;
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let record = RestoreCoordinator::apply_restore(
        state.store(),
        record_id,
        target,
        &user.actor,
        input.change_notes.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: record }))
}
