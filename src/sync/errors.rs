//! # Sync Errors
//!
//! Error taxonomy at the synchronization service boundary.

use std::fmt;

use thiserror::Error;

use crate::commit::CommitLogError;
use crate::model::ModelError;
use crate::store::StoreError;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Machine-distinguishable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    StorageUnavailable,
}

impl ErrorKind {
    /// Stable code string
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sync service errors
///
/// Notification failures are not represented here: they never fail a
/// mutation that has already been applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The request did not parse. Terminal for the call.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ModelError),

    /// The entry store or commit log failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SyncError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Whether the caller may retry the whole call.
    ///
    /// The service itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::StorageUnavailable(_))
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        SyncError::StorageUnavailable(err.to_string())
    }
}

impl From<CommitLogError> for SyncError {
    fn from(err: CommitLogError) -> Self {
        SyncError::StorageUnavailable(err.to_string())
    }
}
