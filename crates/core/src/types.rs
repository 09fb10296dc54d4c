/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version numbers are positive PostgreSQL INTEGERs.
pub type VersionNumber = i32;

/// Opaque questionnaire content: nested sections of answers plus derived
/// fields. The history engine never looks inside beyond equality checks.
pub type Payload = serde_json::Value;
