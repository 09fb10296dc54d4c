//! Record (mutable head) model and DTOs.

use formhist_core::types::{DbId, Payload, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `records` table. Soft-deleted rows are never returned.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Record {
    pub id: DbId,
    pub current_version: VersionNumber,
    pub payload: Payload,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new record at version 1.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecord {
    pub payload: Payload,
    pub created_by: String,
}
