//! # Entry Store Errors

use std::io;

use thiserror::Error;

/// Result type for entry store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Entry store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation
    #[error("Entry store unavailable: {0}")]
    Unavailable(String),

    /// I/O failure in a file-backed store
    #[error("Entry store I/O error: {0}")]
    Io(#[from] io::Error),

    /// A persisted document could not be decoded
    #[error("Entry store corrupted at line {line}: {reason}")]
    Corrupted { line: usize, reason: String },
}

impl StoreError {
    pub(crate) fn lock_poisoned() -> Self {
        StoreError::Unavailable("Lock poisoned".into())
    }
}
