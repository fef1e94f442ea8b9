//! # Commit Log Errors

use std::io;

use thiserror::Error;

/// Result type for commit log operations
pub type CommitResult<T> = Result<T, CommitLogError>;

/// Commit log errors
#[derive(Debug, Error)]
pub enum CommitLogError {
    /// Backend could not be reached or refused the append
    #[error("Commit log unavailable: {0}")]
    Unavailable(String),

    /// I/O failure in a file-backed log
    #[error("Commit log I/O error: {0}")]
    Io(#[from] io::Error),

    /// A persisted commit could not be decoded
    #[error("Commit log corrupted at line {line}: {reason}")]
    Corrupted { line: usize, reason: String },
}
