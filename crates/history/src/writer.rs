//! Snapshot writer.
//!
//! Captures the state a mutation is about to supersede. Writes are upserts on
//! `(record_id, version)` and are best-effort: a storage failure is logged and
//! reported as `None`, never as an error, so the enclosing mutation can still
//! proceed.

use formhist_core::actor::ActorId;
use formhist_core::types::{Payload, VersionNumber};
use formhist_core::versioning::{
    has_content, resolve_change_notes, restored_from_note, DEFAULT_UPDATE_NOTES,
};
use formhist_db::models::record::Record;
use formhist_db::models::snapshot::{NewSnapshot, Snapshot};
use formhist_db::VersionStore;

/// Parameters for a single snapshot write.
///
/// ```ignore
/// let write = SnapshotWrite::new(&head, &actor)
///     .notes(Some("Corrected dosage"))
///     .restoration_of(2);
/// let snapshot = VersionWriter::write_snapshot(store, write).await;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SnapshotWrite<'a> {
    /// The record as it exists before the mutation being recorded.
    pub record: &'a Record,
    pub actor: &'a ActorId,
    pub notes: Option<&'a str>,
    /// `Some(k)` marks the snapshot as a restoration of version `k`.
    pub restored_from_version: Option<VersionNumber>,
    /// Defaults to `record.current_version`.
    pub version_override: Option<VersionNumber>,
    /// Defaults to `record.payload`.
    pub payload_override: Option<&'a Payload>,
}

impl<'a> SnapshotWrite<'a> {
    pub fn new(record: &'a Record, actor: &'a ActorId) -> Self {
        Self {
            record,
            actor,
            notes: None,
            restored_from_version: None,
            version_override: None,
            payload_override: None,
        }
    }

    pub fn notes(mut self, notes: Option<&'a str>) -> Self {
        self.notes = notes;
        self
    }

    pub fn restoration_of(mut self, version: VersionNumber) -> Self {
        self.restored_from_version = Some(version);
        self
    }

    pub fn at_version(mut self, version: VersionNumber) -> Self {
        self.version_override = Some(version);
        self
    }

    pub fn with_payload(mut self, payload: &'a Payload) -> Self {
        self.payload_override = Some(payload);
        self
    }

    fn version(&self) -> VersionNumber {
        self.version_override.unwrap_or(self.record.current_version)
    }

    fn payload(&self) -> &'a Payload {
        self.payload_override.unwrap_or(&self.record.payload)
    }

    /// Restorations default to the short form; the coordinator passes the
    /// full [`restore_note`](formhist_core::versioning::restore_note) as
    /// `notes` since only it has loaded the source snapshot.
    fn change_notes(&self) -> String {
        match self.restored_from_version {
            Some(from) => resolve_change_notes(self.notes, &restored_from_note(from)),
            None => resolve_change_notes(self.notes, DEFAULT_UPDATE_NOTES),
        }
    }
}

/// Writes snapshots into a [`VersionStore`].
pub struct VersionWriter;

impl VersionWriter {
    /// Persist a snapshot of `write.record`.
    ///
    /// Returns `None` when there is no content to capture, when the version
    /// number is not positive, or when the store fails. When the target row
    /// is a restoration source it is left untouched and the existing row is
    /// returned instead.
    pub async fn write_snapshot(
        store: &dyn VersionStore,
        write: SnapshotWrite<'_>,
    ) -> Option<Snapshot> {
        let record_id = write.record.id;
        let version = write.version();
        let payload = write.payload();

        if !has_content(payload) {
            tracing::debug!(record_id, version, "No content to snapshot, skipping");
            return None;
        }
        if version <= 0 {
            tracing::warn!(record_id, version, "Refusing to snapshot a non-positive version");
            return None;
        }

        let input = NewSnapshot {
            record_id,
            version,
            payload: payload.clone(),
            changed_by: write.actor.to_string(),
            change_notes: write.change_notes(),
            is_restoration: write.restored_from_version.is_some(),
            restored_from_version: write.restored_from_version,
        };

        match store.upsert_snapshot(&input).await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    record_id,
                    version,
                    actor = %write.actor,
                    is_restoration = snapshot.is_restoration,
                    "Snapshot written"
                );
                Some(snapshot)
            }
            Ok(None) => {
                tracing::warn!(
                    record_id,
                    version,
                    actor = %write.actor,
                    "Snapshot is a restoration source; keeping the stored row"
                );
                match store.find_snapshot(record_id, version).await {
                    Ok(existing) => existing,
                    Err(err) => {
                        tracing::error!(
                            record_id,
                            version,
                            error = %err,
                            "Failed to reload protected snapshot"
                        );
                        None
                    }
                }
            }
            Err(err) => {
                tracing::error!(
                    record_id,
                    version,
                    actor = %write.actor,
                    error = %err,
                    "Snapshot write failed; audit trail is incomplete"
                );
                None
            }
        }
    }
}
