//! In-memory commit log.

use std::sync::{Arc, Mutex};

use super::errors::{CommitLogError, CommitResult};
use super::{Commit, CommitLog};

/// In-memory commit log for tests and ephemeral servers
#[derive(Debug, Default, Clone)]
pub struct MemoryCommitLog {
    commits: Arc<Mutex<Vec<Commit>>>,
}

impl MemoryCommitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended commits, in append order
    pub fn commits(&self) -> Vec<Commit> {
        self.commits.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.commits.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommitLog for MemoryCommitLog {
    fn append(&self, commit: &Commit) -> CommitResult<()> {
        self.commits
            .lock()
            .map_err(|_| CommitLogError::Unavailable("Lock poisoned".into()))?
            .push(commit.clone());
        Ok(())
    }
}
