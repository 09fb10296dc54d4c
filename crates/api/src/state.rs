use std::sync::Arc;

use formhist_db::VersionStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Record and snapshot storage (Postgres or in-memory).
    pub store: Arc<dyn VersionStore>,
    /// Server configuration (read by the auth extractors).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Borrow the store as the trait object the history engine expects.
    pub fn store(&self) -> &dyn VersionStore {
        self.store.as_ref()
    }
}
