//! Cross-record audit queries over the snapshot table.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use formhist_core::actor::ActorId;
use formhist_core::error::CoreError;
use formhist_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use formhist_history::VersionReader;

use crate::error::AppResult;
use crate::middleware::rbac::RequireHistoryAccess;
use crate::query::ActorSnapshotParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /snapshots?changed_by=&limit=&offset=
// ---------------------------------------------------------------------------

/// Snapshots written by one actor across all records, newest first.
pub async fn list_by_actor(
    State(state): State<AppState>,
    RequireHistoryAccess(_user): RequireHistoryAccess,
    Query(params): Query<ActorSnapshotParams>,
) -> AppResult<impl IntoResponse> {
    let changed_by = params
        .changed_by
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation("changed_by is required".into()))?;
    let actor = ActorId::parse(Some(changed_by))?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let rows = VersionReader::list_by_actor(state.store(), &actor, limit, offset).await?;
    Ok(Json(DataResponse { data: rows }))
}
