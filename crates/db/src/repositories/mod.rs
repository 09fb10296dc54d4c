//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod record_repo;
pub mod snapshot_repo;

pub use record_repo::RecordRepo;
pub use snapshot_repo::SnapshotRepo;
