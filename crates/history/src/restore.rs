//! Point-in-time restoration.
//!
//! A restoration is an ordinary forward mutation: the target payload is
//! copied into the head and `current_version` advances by one. The replaced
//! head is then snapshotted, flagged as a restoration of the target version.

use formhist_core::actor::ActorId;
use formhist_core::error::CoreError;
use formhist_core::types::{DbId, VersionNumber};
use formhist_core::versioning::{
    resolve_change_notes, restore_note, validate_change_notes, validate_version_number,
};
use formhist_db::models::record::Record;
use formhist_db::models::snapshot::Snapshot;
use formhist_db::VersionStore;
use serde::Serialize;

use crate::writer::{SnapshotWrite, VersionWriter};
use crate::HistoryResult;

/// A resolved restoration target and its default audit note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRestore {
    pub snapshot: Snapshot,
    pub auto_note: String,
}

/// Coordinates restorations through the reader-side store lookups and the
/// [`VersionWriter`].
pub struct RestoreCoordinator;

impl RestoreCoordinator {
    /// Resolve the exact snapshot for `target` (no live-head fallback) and
    /// build the default audit note.
    pub async fn prepare_restore(
        store: &dyn VersionStore,
        record_id: DbId,
        target: VersionNumber,
        actor: &ActorId,
    ) -> HistoryResult<PreparedRestore> {
        validate_version_number(target)?;

        let snapshot = store
            .find_snapshot(record_id, target)
            .await?
            .ok_or(CoreError::VersionNotFound {
                record_id,
                version: target,
            })?;

        let auto_note = restore_note(snapshot.version, snapshot.changed_at);
        tracing::debug!(record_id, target, actor = %actor, "Prepared restoration");

        Ok(PreparedRestore {
            snapshot,
            auto_note,
        })
    }

    /// Restore `record_id` to the payload stored for `target`.
    ///
    /// 1. Resolve the target snapshot and the current head.
    /// 2. Copy the target payload into the head and advance its version,
    ///    conditional on nobody else having advanced it first.
    /// 3. Snapshot the replaced head at its old version, flagged as a
    ///    restoration of `target`.
    ///
    /// Returns the updated record.
    pub async fn apply_restore(
        store: &dyn VersionStore,
        record_id: DbId,
        target: VersionNumber,
        actor: &ActorId,
        notes: Option<&str>,
    ) -> HistoryResult<Record> {
        if let Some(notes) = notes {
            validate_change_notes(notes)?;
        }

        let prepared = Self::prepare_restore(store, record_id, target, actor).await?;

        let head = store
            .find_record(record_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Record",
                id: record_id,
            })?;

        if target >= head.current_version {
            return Err(CoreError::Validation(format!(
                "Version {target} is not older than the current version {}",
                head.current_version
            ))
            .into());
        }

        // The snapshot payload is an owned copy, so the head never shares
        // structure with stored history.
        let PreparedRestore {
            snapshot,
            auto_note,
        } = prepared;
        let restored = store
            .advance_record(record_id, head.current_version, &snapshot.payload)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Record {record_id} changed while restoring; expected version {}",
                    head.current_version
                ))
            })?;

        // Recorded only once the head has moved, so a lost race never marks
        // `target` as a restoration source.
        let audit_notes = resolve_change_notes(notes, &auto_note);
        let write = SnapshotWrite::new(&head, actor)
            .notes(Some(&audit_notes))
            .restoration_of(target);
        if VersionWriter::write_snapshot(store, write).await.is_none() {
            tracing::warn!(
                record_id,
                version = head.current_version,
                target,
                "Restored without an audit snapshot of the replaced state"
            );
        }

        tracing::info!(
            record_id,
            restored_from = target,
            new_version = restored.current_version,
            actor = %actor,
            "Record restored"
        );

        Ok(restored)
    }
}
