//! Version reader: history listings, single versions, comparisons, change
//! ranges and restoration lineage.
//!
//! Single-version lookups fall back to the live record when no snapshot
//! exists for its current version; range listings never do.

use std::collections::HashSet;

use formhist_core::actor::ActorId;
use formhist_core::error::CoreError;
use formhist_core::types::{DbId, VersionNumber};
use formhist_core::versioning::{has_content, validate_version_number, version_range};
use formhist_db::models::snapshot::{ActorSnapshotSummary, VersionSummary, VersionView};
use formhist_db::VersionStore;
use serde::Serialize;

use crate::HistoryResult;

/// Two independently resolved versions, labelled as the caller asked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionComparison {
    pub v1: VersionView,
    pub v2: VersionView,
}

/// Read-side operations over a record's history.
pub struct VersionReader;

impl VersionReader {
    /// Snapshot metadata for a record, newest first. Empty when the record
    /// has no history.
    pub async fn list_versions(
        store: &dyn VersionStore,
        record_id: DbId,
    ) -> HistoryResult<Vec<VersionSummary>> {
        let versions = store.list_summaries(record_id).await?;
        tracing::debug!(record_id, count = versions.len(), "Listed versions");
        Ok(versions)
    }

    /// Resolve one version: the stored snapshot, else the live head when it
    /// sits at `version`, else `VersionNotFound`.
    pub async fn get_version(
        store: &dyn VersionStore,
        record_id: DbId,
        version: VersionNumber,
    ) -> HistoryResult<VersionView> {
        validate_version_number(version)?;
        Self::resolve(store, record_id, version)
            .await?
            .ok_or_else(|| CoreError::VersionNotFound { record_id, version }.into())
    }

    /// Resolve both sides of a comparison. Fails if either side is missing.
    ///
    /// No ordering is imposed: `v1` in the result is always the version the
    /// caller passed as `v1`.
    pub async fn compare_versions(
        store: &dyn VersionStore,
        record_id: DbId,
        v1: VersionNumber,
        v2: VersionNumber,
    ) -> HistoryResult<VersionComparison> {
        validate_version_number(v1)?;
        validate_version_number(v2)?;

        let left = Self::get_version(store, record_id, v1).await?;
        let right = Self::get_version(store, record_id, v2).await?;

        tracing::debug!(record_id, v1, v2, "Compared versions");
        Ok(VersionComparison {
            v1: left,
            v2: right,
        })
    }

    /// Stored snapshot metadata in the inclusive range between `v1` and `v2`
    /// (in either order), oldest first. Versions that were never snapshotted
    /// are simply absent.
    pub async fn list_changes(
        store: &dyn VersionStore,
        record_id: DbId,
        v1: VersionNumber,
        v2: VersionNumber,
    ) -> HistoryResult<Vec<VersionSummary>> {
        validate_version_number(v1)?;
        validate_version_number(v2)?;

        let (low, high) = version_range(v1, v2);
        let changes = store.list_summaries_in_range(record_id, low, high).await?;
        tracing::debug!(record_id, low, high, count = changes.len(), "Listed changes");
        Ok(changes)
    }

    /// Follow `restored_from_version` pointers starting at `version`.
    ///
    /// The first entry is the requested snapshot; each following entry is the
    /// snapshot the previous one was restored from. The walk stops at a
    /// non-restoration snapshot, a source that no longer exists, or a
    /// version already visited.
    pub async fn restoration_lineage(
        store: &dyn VersionStore,
        record_id: DbId,
        version: VersionNumber,
    ) -> HistoryResult<Vec<VersionSummary>> {
        validate_version_number(version)?;

        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(version);

        while let Some(current) = next.take() {
            if !visited.insert(current) {
                tracing::warn!(record_id, version = current, "Restoration lineage loops");
                break;
            }
            let Some(snapshot) = store.find_snapshot(record_id, current).await? else {
                if chain.is_empty() {
                    return Err(CoreError::VersionNotFound { record_id, version }.into());
                }
                break;
            };
            next = snapshot.restored_from_version;
            chain.push(VersionSummary::from(&snapshot));
        }

        Ok(chain)
    }

    /// Snapshot metadata written by `actor` across all records, newest first.
    pub async fn list_by_actor(
        store: &dyn VersionStore,
        actor: &ActorId,
        limit: i64,
        offset: i64,
    ) -> HistoryResult<Vec<ActorSnapshotSummary>> {
        let rows = store.list_by_actor(actor.as_str(), limit, offset).await?;
        tracing::debug!(actor = %actor, count = rows.len(), "Listed snapshots by actor");
        Ok(rows)
    }

    /// Snapshot-or-live-head resolution shared by single lookups and
    /// comparisons.
    async fn resolve(
        store: &dyn VersionStore,
        record_id: DbId,
        version: VersionNumber,
    ) -> HistoryResult<Option<VersionView>> {
        if let Some(snapshot) = store.find_snapshot(record_id, version).await? {
            return Ok(Some(VersionView::from(snapshot)));
        }

        let live = store
            .find_record(record_id)
            .await?
            .filter(|record| record.current_version == version && has_content(&record.payload))
            .map(|record| VersionView::from_live_head(&record));

        if live.is_some() {
            tracing::debug!(record_id, version, "Resolved version from live record");
        }
        Ok(live)
    }
}
