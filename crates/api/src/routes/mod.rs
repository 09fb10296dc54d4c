pub mod health;
pub mod records;
pub mod snapshots;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /records                                         create (POST)
/// /records/{id}                                    get, update (PUT), soft delete
/// /records/{id}/versions                           history, newest first
/// /records/{id}/version/{n}                        single version (live-head fallback)
/// /records/{id}/version/{n}/lineage                restoration chain from {n}
/// /records/{id}/diff?v1=&v2=                       both versions side by side
/// /records/{id}/changes?v1=&v2=                    snapshots in range, oldest first
/// /records/{id}/restore-version/{n}                preview (GET), restore (POST)
///
/// /snapshots?changed_by=&limit=&offset=            actor audit across records
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/records", records::router())
        .nest("/snapshots", snapshots::router())
}
