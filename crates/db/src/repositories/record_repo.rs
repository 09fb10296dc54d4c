//! Repository for the `records` table.

use formhist_core::types::{DbId, Payload, VersionNumber};
use sqlx::PgPool;

use crate::models::record::{CreateRecord, Record};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, current_version, payload, created_by, created_at, updated_at";

/// Provides head-document operations for records.
pub struct RecordRepo;

impl RecordRepo {
    /// Insert a new record at version 1, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRecord) -> Result<Record, sqlx::Error> {
        let query = format!(
            "INSERT INTO records (payload, created_by)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(&input.payload)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the payload and advance `current_version` by one, but only if
    /// the stored version still equals `expected_version`.
    ///
    /// Returns `None` when the row is missing, soft-deleted, or was advanced
    /// by another writer in the meantime.
    pub async fn advance_version(
        pool: &PgPool,
        id: DbId,
        expected_version: VersionNumber,
        payload: &Payload,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "UPDATE records SET
                payload = $3,
                current_version = current_version + 1,
                updated_at = NOW()
             WHERE id = $1 AND current_version = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(payload)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a record by ID. Returns `true` if a row was marked deleted.
    ///
    /// Snapshots are left untouched.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE records SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
