use crate::types::{DbId, VersionNumber};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Neither a stored snapshot nor the live head resolves the version.
    #[error("Version {version} of record {record_id} not found")]
    VersionNotFound {
        record_id: DbId,
        version: VersionNumber,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_not_found_names_record_and_version() {
        let err = CoreError::VersionNotFound {
            record_id: 7,
            version: 3,
        };
        assert_eq!(err.to_string(), "Version 3 of record 7 not found");
    }

    #[test]
    fn not_found_names_entity() {
        let err = CoreError::NotFound {
            entity: "Record",
            id: 42,
        };
        assert_eq!(err.to_string(), "Entity not found: Record with id 42");
    }
}
