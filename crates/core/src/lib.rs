//! Domain types, validation rules, and errors shared by every formhist crate.
//!
//! Nothing here touches storage or HTTP; the db, history and api crates build
//! on these definitions.

pub mod actor;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod versioning;
