use axum::routing::get;
use axum::Router;

use crate::handlers::snapshots;
use crate::state::AppState;

/// Cross-record snapshot routes, mounted at `/snapshots`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(snapshots::list_by_actor))
}
