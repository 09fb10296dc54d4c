use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{records, versions};
use crate::state::AppState;

/// Record and record-history routes, mounted at `/records`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(records::create_record))
        .route(
            "/{id}",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        .route("/{id}/versions", get(versions::list_versions))
        .route("/{id}/version/{version}", get(versions::get_version))
        .route(
            "/{id}/version/{version}/lineage",
            get(versions::version_lineage),
        )
        .route("/{id}/diff", get(versions::diff_versions))
        .route("/{id}/changes", get(versions::list_changes))
        .route(
            "/{id}/restore-version/{version}",
            get(versions::preview_restore).post(versions::restore_version),
        )
}
