// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the dogrun platform.

use thiserror::Error;

/// The primary error type used across all dogrun store traits and engine
/// operations.
///
/// `Validation` and `NotFound` are caller-facing and recoverable; the other
/// variants are infrastructure failures that the engine logs in full and
/// surfaces only as a generic failure message.
#[derive(Debug, Error)]
pub enum DogrunError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Object storage errors (image bucket unreachable, delete failure).
    #[error("object storage error: {message}")]
    ObjectStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller violated a precondition (e.g. approving a facility with
    /// unresolved images). Never logged as a system fault.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DogrunError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True for errors the caller can fix by correcting input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_not_found_are_recoverable() {
        assert!(DogrunError::Validation("bad input".into()).is_recoverable());
        assert!(DogrunError::not_found("facility", "f-1").is_recoverable());
        assert!(!DogrunError::Internal("boom".into()).is_recoverable());
        assert!(
            !DogrunError::Storage {
                source: Box::new(std::io::Error::other("down")),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn not_found_display_names_the_entity() {
        let err = DogrunError::not_found("vaccine certification", "c-9");
        assert_eq!(err.to_string(), "vaccine certification not found: c-9");
    }
}
