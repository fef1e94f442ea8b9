//! File-backed commit log.
//!
//! One checksummed JSON commit per line in `<data_dir>/commits.log`,
//! fsynced after each append.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::errors::{CommitLogError, CommitResult};
use super::{Commit, CommitLog};
use crate::checksum::{decode_line, encode_line};
use crate::line_log::LineLog;

/// File name of the commit log inside the data directory
pub const COMMITS_FILE: &str = "commits.log";

/// Durable append-only commit log
#[derive(Debug)]
pub struct FileCommitLog {
    path: PathBuf,
    log: Mutex<LineLog>,
}

impl FileCommitLog {
    /// Open or create the commit log in `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> CommitResult<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(COMMITS_FILE);
        let log = LineLog::open(&path)?;

        Ok(Self {
            path,
            log: Mutex::new(log),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommitLog for FileCommitLog {
    fn append(&self, commit: &Commit) -> CommitResult<()> {
        let json = serde_json::to_string(commit)
            .map_err(|e| CommitLogError::Unavailable(format!("Failed to encode commit: {}", e)))?;
        let line = encode_line(&json);

        let mut log = self
            .log
            .lock()
            .map_err(|_| CommitLogError::Unavailable("Lock poisoned".into()))?;
        log.append_line(&line)?;
        Ok(())
    }
}

/// Read every commit from a commit log file, in append order
pub fn read_commits(path: impl AsRef<Path>) -> CommitResult<Vec<Commit>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut commits = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let corrupted = |reason: String| CommitLogError::Corrupted {
            line: index + 1,
            reason,
        };
        let json = decode_line(&line).map_err(corrupted)?;
        let commit = serde_json::from_str(json).map_err(|e| corrupted(e.to_string()))?;
        commits.push(commit);
    }

    Ok(commits)
}
