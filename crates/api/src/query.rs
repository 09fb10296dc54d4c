//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Version pair for `?v1=&v2=` endpoints.
///
/// Kept as raw strings so that missing, non-numeric and non-positive values
/// all surface as the same validation error instead of an extractor
/// rejection.
#[derive(Debug, Deserialize)]
pub struct VersionRangeParams {
    pub v1: Option<String>,
    pub v2: Option<String>,
}

/// Actor audit query (`?changed_by=&limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct ActorSnapshotParams {
    pub changed_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
