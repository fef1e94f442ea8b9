//! Durable line appends for the file backends.
//!
//! A `LineLog` owns the write side of an append-only line file and tracks
//! the length of its durable prefix. A failed append is cut back to that
//! prefix, so bytes from a rejected line never reach a later flush.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

/// Write side of a line file
pub(crate) trait LineFile: Write + Send + fmt::Debug {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl LineFile for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        // Append mode writes land at the new end after this
        self.set_len(len)
    }
}

/// Append-only line file with rollback of failed appends
#[derive(Debug)]
pub(crate) struct LineLog {
    file: Box<dyn LineFile>,
    durable_len: u64,
    rollback_pending: bool,
}

impl LineLog {
    /// Open `path` for appending, creating it if needed
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();
        Ok(Self::from_file(Box::new(file), len))
    }

    /// Open `path` empty, discarding existing lines
    pub(crate) fn create_empty(path: &Path) -> io::Result<Self> {
        File::create(path)?;
        Self::open(path)
    }

    pub(crate) fn from_file(file: Box<dyn LineFile>, durable_len: u64) -> Self {
        Self {
            file,
            durable_len,
            rollback_pending: false,
        }
    }

    /// Length of the file up to the last successful append
    #[cfg(test)]
    pub(crate) fn durable_len(&self) -> u64 {
        self.durable_len
    }

    /// Append `line` plus a newline and sync it.
    ///
    /// On failure the file is truncated back to its previous length before
    /// the error is returned. If that truncation fails too, every later
    /// append retries it first and fails until it succeeds.
    pub(crate) fn append_line(&mut self, line: &str) -> io::Result<()> {
        if self.rollback_pending {
            self.rollback()?;
        }

        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');

        let written = self
            .file
            .write_all(&bytes)
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync());

        match written {
            Ok(()) => {
                self.durable_len += bytes.len() as u64;
                Ok(())
            }
            Err(err) => {
                self.rollback_pending = true;
                if let Err(rollback_err) = self.rollback() {
                    warn!(
                        durable_len = self.durable_len,
                        error = %rollback_err,
                        "failed to roll back partial line"
                    );
                }
                Err(err)
            }
        }
    }

    fn rollback(&mut self) -> io::Result<()> {
        self.file.truncate_to(self.durable_len)?;
        self.file.sync()?;
        self.rollback_pending = false;
        Ok(())
    }
}
