//! Error types for the provider registry
//!
//! This module defines all error types used throughout the crate.
//!
//! Three kinds are domain outcomes a caller is expected to handle
//! ([`Error::Validation`], [`Error::Conflict`], [`Error::NotFound`]). Everything
//! else is an infrastructure failure and is passed through unmodified.

use thiserror::Error;

use crate::model::{Field, ProviderId};
use crate::validate::ValidationErrors;

/// Result type alias for provider registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the provider registry
#[derive(Error, Debug)]
pub enum Error {
    /// Input failed one or more field rules
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Another active record already uses the same contact value
    #[error("Conflict: {field} already exists")]
    Conflict {
        /// The field that collided
        field: Field,
    },

    /// No active record has this id
    #[error("Provider {0} not found")]
    NotFound(ProviderId),

    /// Provider store errors
    #[error("Provider store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a uniqueness conflict on `field`
    pub fn conflict(field: Field) -> Self {
        Self::Conflict { field }
    }

    /// Create a "not found" error
    pub fn not_found(id: ProviderId) -> Self {
        Self::NotFound(id)
    }

    /// Create a provider store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this is a validation, conflict or not-found outcome
    ///
    /// Domain errors are scoped to one operation and are recoverable by the
    /// caller. Anything else came from the infrastructure.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Conflict { .. } | Error::NotFound(_)
        )
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
