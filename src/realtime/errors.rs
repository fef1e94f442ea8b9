//! # Real-Time Errors
//!
//! Error types for the notification channel.

use thiserror::Error;

/// Result type for real-time operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Real-time errors
///
/// These never unwind a successful mutation; the sync service reports them
/// as non-fatal notification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// Listener not found
    #[error("Listener not found: {0}")]
    ListenerNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RealtimeError {
    pub(crate) fn lock_poisoned() -> Self {
        RealtimeError::Internal("Lock poisoned".into())
    }
}
