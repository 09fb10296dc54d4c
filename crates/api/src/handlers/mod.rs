pub mod records;
pub mod snapshots;
pub mod versions;
