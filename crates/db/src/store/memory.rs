use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use formhist_core::types::{DbId, Payload, VersionNumber};
use tokio::sync::RwLock;

use super::{StoreError, VersionStore};
use crate::models::record::{CreateRecord, Record};
use crate::models::snapshot::{ActorSnapshotSummary, NewSnapshot, Snapshot, VersionSummary};

/// In-process [`VersionStore`] with the same semantics as the Postgres
/// backend: soft deletion, version-checked head updates, and upserts that
/// never overwrite a restoration source.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`.
#[derive(Default)]
pub struct MemoryVersionStore {
    state: RwLock<MemoryState>,
    fail_snapshot_writes: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    last_record_id: DbId,
    last_snapshot_id: DbId,
    records: HashMap<DbId, StoredRecord>,
    snapshots: BTreeMap<(DbId, VersionNumber), Snapshot>,
    /// A competing head write applied just before the next version check on
    /// that record.
    interleaved: Option<(DbId, Payload)>,
}

struct StoredRecord {
    record: Record,
    deleted: bool,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent snapshot write fail with
    /// [`StoreError::Unavailable`]. Used to exercise best-effort auditing.
    pub fn fail_snapshot_writes(&self, fail: bool) {
        self.fail_snapshot_writes.store(fail, Ordering::SeqCst);
    }

    /// Simulate another writer winning the race: the next `advance_record`
    /// on `record_id` first advances the head to `payload`, so the caller's
    /// version check misses.
    pub async fn interleave_concurrent_update(&self, record_id: DbId, payload: Payload) {
        self.state.write().await.interleaved = Some((record_id, payload));
    }

    /// Number of snapshot rows stored for a record, including rows for
    /// soft-deleted records.
    pub async fn snapshot_count(&self, record_id: DbId) -> usize {
        self.state
            .read()
            .await
            .snapshots
            .range((record_id, VersionNumber::MIN)..=(record_id, VersionNumber::MAX))
            .count()
    }
}

impl MemoryState {
    fn snapshots_of(
        &self,
        record_id: DbId,
    ) -> impl DoubleEndedIterator<Item = &Snapshot> + '_ {
        self.snapshots
            .range((record_id, VersionNumber::MIN)..=(record_id, VersionNumber::MAX))
            .map(|(_, s)| s)
    }

    fn is_restoration_source(&self, record_id: DbId, version: VersionNumber) -> bool {
        self.snapshots_of(record_id)
            .any(|s| s.restored_from_version == Some(version))
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn create_record(&self, input: &CreateRecord) -> Result<Record, StoreError> {
        let mut state = self.state.write().await;
        state.last_record_id += 1;
        let now = chrono::Utc::now();
        let record = Record {
            id: state.last_record_id,
            current_version: formhist_core::versioning::INITIAL_VERSION,
            payload: input.payload.clone(),
            created_by: input.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        state.records.insert(
            record.id,
            StoredRecord {
                record: record.clone(),
                deleted: false,
            },
        );
        Ok(record)
    }

    async fn find_record(&self, id: DbId) -> Result<Option<Record>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .get(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| stored.record.clone()))
    }

    async fn advance_record(
        &self,
        id: DbId,
        expected_version: VersionNumber,
        payload: &Payload,
    ) -> Result<Option<Record>, StoreError> {
        let mut state = self.state.write().await;
        let competing = match state.interleaved.take() {
            Some((record_id, payload)) if record_id == id => Some(payload),
            other => {
                state.interleaved = other;
                None
            }
        };
        let Some(stored) = state.records.get_mut(&id) else {
            return Ok(None);
        };
        if stored.deleted {
            return Ok(None);
        }
        if let Some(payload) = competing {
            stored.record.payload = payload;
            stored.record.current_version += 1;
            stored.record.updated_at = chrono::Utc::now();
        }
        if stored.record.current_version != expected_version {
            return Ok(None);
        }
        stored.record.payload = payload.clone();
        stored.record.current_version += 1;
        stored.record.updated_at = chrono::Utc::now();
        Ok(Some(stored.record.clone()))
    }

    async fn soft_delete_record(&self, id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn upsert_snapshot(&self, input: &NewSnapshot) -> Result<Option<Snapshot>, StoreError> {
        if self.fail_snapshot_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "snapshot writes disabled".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        let key = (input.record_id, input.version);

        let existing_id = state.snapshots.get(&key).map(|s| s.id);
        let id = match existing_id {
            Some(_) if state.is_restoration_source(input.record_id, input.version) => {
                return Ok(None);
            }
            Some(id) => id,
            None => {
                state.last_snapshot_id += 1;
                state.last_snapshot_id
            }
        };

        let snapshot = Snapshot {
            id,
            record_id: input.record_id,
            version: input.version,
            payload: input.payload.clone(),
            changed_by: input.changed_by.clone(),
            changed_at: chrono::Utc::now(),
            change_notes: input.change_notes.clone(),
            is_restoration: input.is_restoration,
            restored_from_version: input.restored_from_version,
        };
        state.snapshots.insert(key, snapshot.clone());
        Ok(Some(snapshot))
    }

    async fn find_snapshot(
        &self,
        record_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<Snapshot>, StoreError> {
        let state = self.state.read().await;
        Ok(state.snapshots.get(&(record_id, version)).cloned())
    }

    async fn list_summaries(&self, record_id: DbId) -> Result<Vec<VersionSummary>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .snapshots_of(record_id)
            .rev()
            .map(VersionSummary::from)
            .collect())
    }

    async fn list_summaries_in_range(
        &self,
        record_id: DbId,
        low: VersionNumber,
        high: VersionNumber,
    ) -> Result<Vec<VersionSummary>, StoreError> {
        if low > high {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        Ok(state
            .snapshots
            .range((record_id, low)..=(record_id, high))
            .map(|(_, s)| VersionSummary::from(s))
            .collect())
    }

    async fn list_by_actor(
        &self,
        changed_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActorSnapshotSummary>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<&Snapshot> = state
            .snapshots
            .values()
            .filter(|s| s.changed_by == changed_by)
            .collect();
        rows.sort_by(|a, b| {
            b.changed_at
                .cmp(&a.changed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(ActorSnapshotSummary::from)
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
