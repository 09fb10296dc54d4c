//! Explicit actor identity for every versioning operation.
//!
//! Handlers derive an [`ActorId`] from the authenticated request and pass it
//! down; the engine never reads the actor from ambient state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of an actor identifier.
pub const MAX_ACTOR_LENGTH: usize = 128;

/// A validated, non-blank actor identifier (user id, service name, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Parse an optional raw actor id.
    ///
    /// A missing or blank actor is an authentication failure, not a
    /// validation failure: the caller never established who is acting.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(CoreError::Unauthorized(
                "An authenticated actor is required".to_string(),
            ));
        }
        if trimmed.len() > MAX_ACTOR_LENGTH {
            return Err(CoreError::Validation(format!(
                "Actor id exceeds maximum length of {MAX_ACTOR_LENGTH} characters (got {})",
                trimmed.len()
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
