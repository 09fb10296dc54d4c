//! Row structs and DTOs for the `records` and `record_snapshots` tables.

pub mod record;
pub mod snapshot;
