//! # Model Errors
//!
//! Parse-time errors for the key/value model.

use thiserror::Error;

/// Result type for model parsing
pub type ModelResult<T> = Result<T, ModelError>;

/// Model parse errors
///
/// Always caller-fault. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field is missing or has the wrong primitive type
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Dotted path of the offending field
        path: String,
        /// Expected JSON type
        expected: &'static str,
        /// JSON type actually seen, or "missing"
        found: &'static str,
    },
}

impl ModelError {
    /// Create a type mismatch error
    pub fn type_mismatch(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        ModelError::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a missing-field error
    pub fn missing(path: impl Into<String>, expected: &'static str) -> Self {
        Self::type_mismatch(path, expected, "missing")
    }

    /// Path of the offending field
    pub fn path(&self) -> &str {
        match self {
            ModelError::TypeMismatch { path, .. } => path,
        }
    }
}
