//! Revision-history constants and validation.
//!
//! Shared by the history engine and the HTTP layer so that invalid version
//! numbers and notes are rejected before any storage access.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Payload, Timestamp, VersionNumber};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Version assigned to a freshly created record.
pub const INITIAL_VERSION: VersionNumber = 1;

/// Maximum length for snapshot change notes in characters.
pub const MAX_CHANGE_NOTES_LENGTH: usize = 1_000;

/// `changed_by` reported for a version synthesized from the live record.
pub const LIVE_HEAD_ACTOR: &str = "current-record";

/// `change_notes` reported for a version synthesized from the live record.
pub const LIVE_HEAD_NOTES: &str = "Current record state";

/// Notes recorded on an update snapshot when the caller supplies none.
pub const DEFAULT_UPDATE_NOTES: &str = "Record updated";

// ---------------------------------------------------------------------------
// Version source
// ---------------------------------------------------------------------------

/// Where a resolved version came from.
///
/// - `Snapshot` -- a persisted history row.
/// - `LiveHead` -- synthesized from the current record because no row exists
///   for its current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    Snapshot,
    LiveHead,
}

impl VersionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::LiveHead => "live_head",
        }
    }
}

impl std::fmt::Display for VersionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a version number: must be strictly positive.
pub fn validate_version_number(version: VersionNumber) -> Result<(), CoreError> {
    if version <= 0 {
        return Err(CoreError::Validation(format!(
            "Version number must be a positive integer (got {version})"
        )));
    }
    Ok(())
}

/// Parse and validate a version number supplied as a path segment or query
/// parameter named `name`.
///
/// Missing, non-numeric, zero and negative values are all validation errors.
pub fn parse_version_param(name: &str, raw: Option<&str>) -> Result<VersionNumber, CoreError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("Missing required parameter '{name}'")))?;

    let version: VersionNumber = raw.parse().map_err(|_| {
        CoreError::Validation(format!(
            "Parameter '{name}' must be a positive integer (got '{raw}')"
        ))
    })?;

    validate_version_number(version)?;
    Ok(version)
}

/// Validate change notes: length check only (may be empty).
pub fn validate_change_notes(notes: &str) -> Result<(), CoreError> {
    let len = notes.chars().count();
    if len > MAX_CHANGE_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change notes exceed maximum length of {MAX_CHANGE_NOTES_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate that a payload is a JSON object (sections keyed by name).
pub fn validate_payload(payload: &Payload) -> Result<(), CoreError> {
    if payload.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "payload must be a JSON object".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the payload holds anything worth snapshotting.
///
/// `null`, `{}` and `[]` are treated as "no content".
pub fn has_content(payload: &Payload) -> bool {
    match payload {
        Payload::Null => false,
        Payload::Object(map) => !map.is_empty(),
        Payload::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Use caller-supplied notes unless they are absent or blank.
pub fn resolve_change_notes(notes: Option<&str>, default: &str) -> String {
    match notes.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default.to_string(),
    }
}

/// Short restoration note, used when the source snapshot's save time is not
/// at hand.
pub fn restored_from_note(version: VersionNumber) -> String {
    format!("Restored from version {version}")
}

/// Default audit note for a restoration, naming the restored version and the
/// time it was originally saved.
///
/// Always starts with [`restored_from_note`] for the same version.
pub fn restore_note(version: VersionNumber, originally_saved: Timestamp) -> String {
    format!(
        "{} (originally saved {})",
        restored_from_note(version),
        originally_saved.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )
}

/// Order two version bounds into an inclusive `(low, high)` range.
pub fn version_range(a: VersionNumber, b: VersionNumber) -> (VersionNumber, VersionNumber) {
    (a.min(b), a.max(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
