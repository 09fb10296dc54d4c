//! Repository for the `record_snapshots` table.
//!
//! Writes are upserts keyed by `(record_id, version)`. A row that another
//! snapshot names as its `restored_from_version` is never overwritten.

use formhist_core::types::{DbId, VersionNumber};
use sqlx::PgPool;

use crate::models::snapshot::{ActorSnapshotSummary, NewSnapshot, Snapshot, VersionSummary};

/// Column list for full snapshot queries.
const COLUMNS: &str = "id, record_id, version, payload, changed_by, changed_at, \
    change_notes, is_restoration, restored_from_version";

/// Column list for metadata-only queries (payload excluded).
const SUMMARY_COLUMNS: &str =
    "version, changed_by, changed_at, change_notes, is_restoration, restored_from_version";

/// Provides write and read operations for record snapshots.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Insert a snapshot, or overwrite the existing row for the same
    /// `(record_id, version)`.
    ///
    /// Returns `None` when the existing row is a restoration source and was
    /// therefore left untouched.
    pub async fn upsert(
        pool: &PgPool,
        input: &NewSnapshot,
    ) -> Result<Option<Snapshot>, sqlx::Error> {
        let query = format!(
            "INSERT INTO record_snapshots
                (record_id, version, payload, changed_by, change_notes,
                 is_restoration, restored_from_version)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (record_id, version) DO UPDATE SET
                payload = EXCLUDED.payload,
                changed_by = EXCLUDED.changed_by,
                changed_at = NOW(),
                change_notes = EXCLUDED.change_notes,
                is_restoration = EXCLUDED.is_restoration,
                restored_from_version = EXCLUDED.restored_from_version
             WHERE NOT EXISTS (
                SELECT 1 FROM record_snapshots lineage
                WHERE lineage.record_id = EXCLUDED.record_id
                  AND lineage.restored_from_version = EXCLUDED.version
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(input.record_id)
            .bind(input.version)
            .bind(&input.payload)
            .bind(&input.changed_by)
            .bind(&input.change_notes)
            .bind(input.is_restoration)
            .bind(input.restored_from_version)
            .fetch_optional(pool)
            .await
    }

    /// Find the snapshot for an exact `(record_id, version)` pair.
    pub async fn find_by_record_and_version(
        pool: &PgPool,
        record_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<Snapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM record_snapshots
             WHERE record_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, Snapshot>(&query)
            .bind(record_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// List snapshot metadata for a record, newest first.
    pub async fn list_by_record(
        pool: &PgPool,
        record_id: DbId,
    ) -> Result<Vec<VersionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM record_snapshots
             WHERE record_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, VersionSummary>(&query)
            .bind(record_id)
            .fetch_all(pool)
            .await
    }

    /// List snapshot metadata with `low <= version <= high`, oldest first.
    pub async fn list_in_range(
        pool: &PgPool,
        record_id: DbId,
        low: VersionNumber,
        high: VersionNumber,
    ) -> Result<Vec<VersionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM record_snapshots
             WHERE record_id = $1 AND version BETWEEN $2 AND $3
             ORDER BY version ASC"
        );
        sqlx::query_as::<_, VersionSummary>(&query)
            .bind(record_id)
            .bind(low)
            .bind(high)
            .fetch_all(pool)
            .await
    }

    /// List snapshots written by an actor across all records, newest first.
    pub async fn list_by_actor(
        pool: &PgPool,
        changed_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActorSnapshotSummary>, sqlx::Error> {
        let query = format!(
            "SELECT record_id, {SUMMARY_COLUMNS} FROM record_snapshots
             WHERE changed_by = $1
             ORDER BY changed_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActorSnapshotSummary>(&query)
            .bind(changed_by)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
