use async_trait::async_trait;
use formhist_core::types::{DbId, Payload, VersionNumber};

use super::{StoreError, VersionStore};
use crate::models::record::{CreateRecord, Record};
use crate::models::snapshot::{ActorSnapshotSummary, NewSnapshot, Snapshot, VersionSummary};
use crate::repositories::{RecordRepo, SnapshotRepo};
use crate::DbPool;

/// [`VersionStore`] backed by PostgreSQL through the repository layer.
#[derive(Clone)]
pub struct PgVersionStore {
    pool: DbPool,
}

impl PgVersionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn create_record(&self, input: &CreateRecord) -> Result<Record, StoreError> {
        Ok(RecordRepo::create(&self.pool, input).await?)
    }

    async fn find_record(&self, id: DbId) -> Result<Option<Record>, StoreError> {
        Ok(RecordRepo::find_by_id(&self.pool, id).await?)
    }

    async fn advance_record(
        &self,
        id: DbId,
        expected_version: VersionNumber,
        payload: &Payload,
    ) -> Result<Option<Record>, StoreError> {
        Ok(RecordRepo::advance_version(&self.pool, id, expected_version, payload).await?)
    }

    async fn soft_delete_record(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(RecordRepo::soft_delete(&self.pool, id).await?)
    }

    async fn upsert_snapshot(&self, input: &NewSnapshot) -> Result<Option<Snapshot>, StoreError> {
        Ok(SnapshotRepo::upsert(&self.pool, input).await?)
    }

    async fn find_snapshot(
        &self,
        record_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<Snapshot>, StoreError> {
        Ok(SnapshotRepo::find_by_record_and_version(&self.pool, record_id, version).await?)
    }

    async fn list_summaries(&self, record_id: DbId) -> Result<Vec<VersionSummary>, StoreError> {
        Ok(SnapshotRepo::list_by_record(&self.pool, record_id).await?)
    }

    async fn list_summaries_in_range(
        &self,
        record_id: DbId,
        low: VersionNumber,
        high: VersionNumber,
    ) -> Result<Vec<VersionSummary>, StoreError> {
        Ok(SnapshotRepo::list_in_range(&self.pool, record_id, low, high).await?)
    }

    async fn list_by_actor(
        &self,
        changed_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActorSnapshotSummary>, StoreError> {
        Ok(SnapshotRepo::list_by_actor(&self.pool, changed_by, limit, offset).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
