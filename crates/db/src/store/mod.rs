//! The storage seam behind the history engine.
//!
//! [`VersionStore`] covers exactly what the engine needs from the document
//! store: the record head (with a version-checked update) and the snapshot
//! table. [`PgVersionStore`] backs production; [`MemoryVersionStore`] backs
//! tests and local development.

mod memory;
mod postgres;

use async_trait::async_trait;
use formhist_core::types::{DbId, Payload, VersionNumber};

pub use memory::MemoryVersionStore;
pub use postgres::PgVersionStore;

use crate::models::record::{CreateRecord, Record};
use crate::models::snapshot::{ActorSnapshotSummary, NewSnapshot, Snapshot, VersionSummary};

/// Errors raised by a [`VersionStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend could not serve the request (non-SQL backends).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations for record heads and their snapshots.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Insert a new record at version 1.
    async fn create_record(&self, input: &CreateRecord) -> Result<Record, StoreError>;

    /// Fetch a live (not soft-deleted) record.
    async fn find_record(&self, id: DbId) -> Result<Option<Record>, StoreError>;

    /// Replace the payload and advance `current_version` by one if, and only
    /// if, the stored version equals `expected_version`. `None` signals a
    /// missing record or a lost race.
    async fn advance_record(
        &self,
        id: DbId,
        expected_version: VersionNumber,
        payload: &Payload,
    ) -> Result<Option<Record>, StoreError>;

    /// Soft-delete a record. Returns `true` if a live row was marked deleted.
    async fn soft_delete_record(&self, id: DbId) -> Result<bool, StoreError>;

    /// Insert or overwrite the snapshot for `(record_id, version)`. `None`
    /// means the existing row is a restoration source and was kept.
    async fn upsert_snapshot(&self, input: &NewSnapshot) -> Result<Option<Snapshot>, StoreError>;

    /// Fetch the snapshot for an exact `(record_id, version)` pair.
    async fn find_snapshot(
        &self,
        record_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<Snapshot>, StoreError>;

    /// Snapshot metadata for a record, newest first.
    async fn list_summaries(&self, record_id: DbId) -> Result<Vec<VersionSummary>, StoreError>;

    /// Snapshot metadata with `low <= version <= high`, oldest first.
    async fn list_summaries_in_range(
        &self,
        record_id: DbId,
        low: VersionNumber,
        high: VersionNumber,
    ) -> Result<Vec<VersionSummary>, StoreError>;

    /// Snapshot metadata written by `changed_by`, newest first.
    async fn list_by_actor(
        &self,
        changed_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActorSnapshotSummary>, StoreError>;

    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
