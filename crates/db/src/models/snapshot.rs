//! Snapshot models, projections and DTOs.
//!
//! Snapshots are keyed by `(record_id, version)` and are immutable apart from
//! the retry upsert performed by the version writer.

use formhist_core::types::{DbId, Payload, Timestamp, VersionNumber};
use formhist_core::versioning::{VersionSource, LIVE_HEAD_ACTOR, LIVE_HEAD_NOTES};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::record::Record;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `record_snapshots` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: DbId,
    pub record_id: DbId,
    pub version: VersionNumber,
    pub payload: Payload,
    pub changed_by: String,
    pub changed_at: Timestamp,
    pub change_notes: String,
    pub is_restoration: bool,
    pub restored_from_version: Option<VersionNumber>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Metadata-only view of a snapshot (no payload).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version: VersionNumber,
    pub changed_by: String,
    pub changed_at: Timestamp,
    pub change_notes: String,
    pub is_restoration: bool,
    pub restored_from_version: Option<VersionNumber>,
}

impl From<&Snapshot> for VersionSummary {
    fn from(s: &Snapshot) -> Self {
        Self {
            version: s.version,
            changed_by: s.changed_by.clone(),
            changed_at: s.changed_at,
            change_notes: s.change_notes.clone(),
            is_restoration: s.is_restoration,
            restored_from_version: s.restored_from_version,
        }
    }
}

/// Metadata-only view of a snapshot, tagged with its record, for audit
/// queries by actor.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ActorSnapshotSummary {
    pub record_id: DbId,
    pub version: VersionNumber,
    pub changed_by: String,
    pub changed_at: Timestamp,
    pub change_notes: String,
    pub is_restoration: bool,
    pub restored_from_version: Option<VersionNumber>,
}

impl From<&Snapshot> for ActorSnapshotSummary {
    fn from(s: &Snapshot) -> Self {
        Self {
            record_id: s.record_id,
            version: s.version,
            changed_by: s.changed_by.clone(),
            changed_at: s.changed_at,
            change_notes: s.change_notes.clone(),
            is_restoration: s.is_restoration,
            restored_from_version: s.restored_from_version,
        }
    }
}

/// A fully resolved version, either a stored snapshot or the live head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionView {
    pub record_id: DbId,
    pub version: VersionNumber,
    pub payload: Payload,
    pub changed_by: String,
    pub changed_at: Timestamp,
    pub change_notes: String,
    pub is_restoration: bool,
    pub restored_from_version: Option<VersionNumber>,
    pub source: VersionSource,
}

impl From<Snapshot> for VersionView {
    fn from(s: Snapshot) -> Self {
        Self {
            record_id: s.record_id,
            version: s.version,
            payload: s.payload,
            changed_by: s.changed_by,
            changed_at: s.changed_at,
            change_notes: s.change_notes,
            is_restoration: s.is_restoration,
            restored_from_version: s.restored_from_version,
            source: VersionSource::Snapshot,
        }
    }
}

impl VersionView {
    /// Synthesize a pseudo-snapshot of the record's current state.
    pub fn from_live_head(record: &Record) -> Self {
        Self {
            record_id: record.id,
            version: record.current_version,
            payload: record.payload.clone(),
            changed_by: LIVE_HEAD_ACTOR.to_string(),
            changed_at: record.updated_at,
            change_notes: LIVE_HEAD_NOTES.to_string(),
            is_restoration: false,
            restored_from_version: None,
            source: VersionSource::LiveHead,
        }
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for writing (upserting) a snapshot row.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub record_id: DbId,
    pub version: VersionNumber,
    pub payload: Payload,
    pub changed_by: String,
    pub change_notes: String,
    pub is_restoration: bool,
    pub restored_from_version: Option<VersionNumber>,
}
