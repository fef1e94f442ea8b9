//! # Commit Log
//!
//! Append-only audit record of every accepted mutation, kept independently
//! of the entry store. Commits are never updated or deleted.
//!
//! A commit is appended *before* the store mutation it describes, so a
//! commit may exist without a matching applied mutation, never the reverse.

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::{CommitLogError, CommitResult};
pub use file::{read_commits, FileCommitLog, COMMITS_FILE};
pub use memory::MemoryCommitLog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::UpdateRequest;

/// Namespace of entry commits
pub const ENTRY_NAMESPACE: &str = "/entry";

/// Event name of an entry update commit
pub const UPDATE_EVENT: &str = "update";

/// An immutable audit record of one accepted mutation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// When the commit was created
    pub date: DateTime<Utc>,

    /// Client or session that issued the request
    pub client: Option<String>,

    /// Namespace the request arrived on
    pub namespace: String,

    /// Event name within the namespace
    pub event: String,

    /// Serialized request payload
    pub data: Value,
}

impl Commit {
    /// Commit for an entry update, stamped now
    pub fn update(request: &UpdateRequest, client: Option<String>) -> Self {
        Self {
            date: Utc::now(),
            client,
            namespace: ENTRY_NAMESPACE.to_string(),
            event: UPDATE_EVENT.to_string(),
            data: request.to_value(),
        }
    }

    /// Whether this commit records an entry update
    pub fn is_entry_update(&self) -> bool {
        self.namespace == ENTRY_NAMESPACE && self.event == UPDATE_EVENT
    }
}

/// Append-only commit log
pub trait CommitLog: Send + Sync + std::fmt::Debug {
    /// Append a commit. The commit is durable once this returns `Ok`.
    fn append(&self, commit: &Commit) -> CommitResult<()>;
}
