//! Record head mutations.
//!
//! Every accepted content change snapshots the superseded state through the
//! [`VersionWriter`] and then advances `current_version` with a conditional
//! update, so concurrent writers surface as `Conflict` instead of silently
//! overwriting each other.

use formhist_core::actor::ActorId;
use formhist_core::error::CoreError;
use formhist_core::types::{DbId, Payload, VersionNumber};
use formhist_core::versioning::{validate_change_notes, validate_payload, validate_version_number};
use formhist_db::models::record::{CreateRecord, Record};
use formhist_db::VersionStore;

use crate::writer::{SnapshotWrite, VersionWriter};
use crate::HistoryResult;

/// A requested content change.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    pub payload: Payload,
    pub change_notes: Option<String>,
    /// When set, the update is rejected unless the head is at this version.
    pub expected_version: Option<VersionNumber>,
}

/// Operations on the mutable record head.
pub struct RecordState;

impl RecordState {
    /// Create a record at version 1. No snapshot is written; the first state
    /// is served through the live-head fallback until it is superseded.
    pub async fn create(
        store: &dyn VersionStore,
        actor: &ActorId,
        payload: Payload,
    ) -> HistoryResult<Record> {
        validate_payload(&payload)?;

        let record = store
            .create_record(&CreateRecord {
                payload,
                created_by: actor.to_string(),
            })
            .await?;

        tracing::info!(record_id = record.id, actor = %actor, "Record created");
        Ok(record)
    }

    /// Fetch a live record.
    pub async fn get(store: &dyn VersionStore, record_id: DbId) -> HistoryResult<Record> {
        store.find_record(record_id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: "Record",
                id: record_id,
            }
            .into()
        })
    }

    /// Replace the record payload.
    ///
    /// An unchanged payload is not a mutation: the head is returned as-is and
    /// no snapshot is written.
    pub async fn update(
        store: &dyn VersionStore,
        record_id: DbId,
        actor: &ActorId,
        update: RecordUpdate,
    ) -> HistoryResult<Record> {
        validate_payload(&update.payload)?;
        if let Some(notes) = update.change_notes.as_deref() {
            validate_change_notes(notes)?;
        }
        if let Some(expected) = update.expected_version {
            validate_version_number(expected)?;
        }

        let head = Self::get(store, record_id).await?;

        if let Some(expected) = update.expected_version {
            if expected != head.current_version {
                return Err(CoreError::Conflict(format!(
                    "Record {record_id} is at version {}, not {expected}",
                    head.current_version
                ))
                .into());
            }
        }

        if head.payload == update.payload {
            tracing::debug!(record_id, version = head.current_version, "Payload unchanged");
            return Ok(head);
        }

        // Advance first: only the writer that wins the version check records
        // the pre-image, so a lost race leaves no snapshot behind.
        let updated = store
            .advance_record(record_id, head.current_version, &update.payload)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Record {record_id} was modified concurrently; expected version {}",
                    head.current_version
                ))
            })?;

        let write = SnapshotWrite::new(&head, actor).notes(update.change_notes.as_deref());
        if VersionWriter::write_snapshot(store, write).await.is_none() {
            tracing::warn!(
                record_id,
                version = head.current_version,
                "Updated without a snapshot of the previous state"
            );
        }

        tracing::info!(
            record_id,
            new_version = updated.current_version,
            actor = %actor,
            "Record updated"
        );
        Ok(updated)
    }

    /// Soft-delete a record. Its history is kept.
    pub async fn delete(
        store: &dyn VersionStore,
        record_id: DbId,
        actor: &ActorId,
    ) -> HistoryResult<()> {
        if !store.soft_delete_record(record_id).await? {
            return Err(CoreError::NotFound {
                entity: "Record",
                id: record_id,
            }
            .into());
        }
        tracing::info!(record_id, actor = %actor, "Record soft-deleted");
        Ok(())
    }
}
