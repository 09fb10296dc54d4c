//! Revision-history engine for questionnaire records.
//!
//! - [`writer::VersionWriter`] -- best-effort snapshot upserts.
//! - [`reader::VersionReader`] -- history, single versions, comparisons,
//!   change ranges and restoration lineage.
//! - [`restore::RestoreCoordinator`] -- point-in-time restoration.
//! - [`records::RecordState`] -- head mutations that feed the writer.
//!
//! Every operation takes the [`VersionStore`](formhist_db::VersionStore) and,
//! where it mutates, an explicit [`ActorId`](formhist_core::actor::ActorId).

pub mod reader;
pub mod records;
pub mod restore;
pub mod writer;

use formhist_core::error::CoreError;
use formhist_db::StoreError;

pub use reader::{VersionComparison, VersionReader};
pub use records::{RecordState, RecordUpdate};
pub use restore::{PreparedRestore, RestoreCoordinator};
pub use writer::{SnapshotWrite, VersionWriter};

/// Errors surfaced by history operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// A domain error (not found, validation, conflict, missing actor).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for engine return values.
pub type HistoryResult<T> = Result<T, HistoryError>;
