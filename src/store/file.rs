//! File-backed entry store.
//!
//! Append-only document log at `<data_dir>/entries.log`, one checksummed
//! `{"_id": EntryKey, "amount": ..}` line per upsert. The log is replayed
//! into memory on open; the last line for a key wins.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::{visible, EntryStore};
use crate::checksum::{decode_line, encode_line};
use crate::line_log::LineLog;
use crate::model::{EntryData, EntryKey};

/// File name of the document log inside the data directory
pub const ENTRIES_FILE: &str = "entries.log";

/// Entry store persisted to an append-only document log
#[derive(Debug)]
pub struct FileEntryStore {
    path: PathBuf,
    log: Mutex<LineLog>,
    documents: RwLock<HashMap<EntryKey, EntryData>>,
}

impl FileEntryStore {
    /// Open or create the store in `data_dir`, loading existing documents
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let path = Self::prepare(data_dir.as_ref())?;
        let documents = if path.exists() {
            load_documents(&path)?
        } else {
            HashMap::new()
        };
        let log = LineLog::open(&path)?;

        Ok(Self {
            path,
            log: Mutex::new(log),
            documents: RwLock::new(documents),
        })
    }

    /// Create an empty store in `data_dir`, discarding any existing documents
    pub fn recreate(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let path = Self::prepare(data_dir.as_ref())?;
        let log = LineLog::create_empty(&path)?;

        Ok(Self {
            path,
            log: Mutex::new(log),
            documents: RwLock::new(HashMap::new()),
        })
    }

    fn prepare(data_dir: &Path) -> StoreResult<PathBuf> {
        fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(ENTRIES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored document for `key`, without the visibility filter
    pub fn document(&self, key: &EntryKey) -> StoreResult<Option<EntryData>> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(documents.get(key).copied())
    }

    /// Number of distinct documents
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryStore for FileEntryStore {
    fn find(&self, key: &EntryKey) -> StoreResult<Option<EntryData>> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(visible(documents.get(key)))
    }

    fn upsert(&self, key: &EntryKey, data: &EntryData) -> StoreResult<()> {
        let document = serde_json::json!({
            "_id": key.to_value(),
            "amount": data.amount,
        });
        let line = encode_line(&document.to_string());

        // Log lock is held until the map is updated so memory order
        // matches file order. A failed append leaves both untouched.
        let mut log = self.log.lock().map_err(|_| StoreError::lock_poisoned())?;
        log.append_line(&line)?;

        let mut documents = self.documents.write().map_err(|_| StoreError::lock_poisoned())?;
        documents.insert(key.clone(), *data);
        Ok(())
    }
}

fn load_documents(path: &Path) -> StoreResult<HashMap<EntryKey, EntryData>> {
    let reader = BufReader::new(File::open(path)?);
    let mut documents = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (key, data) = decode_document(&line).map_err(|reason| StoreError::Corrupted {
            line: index + 1,
            reason,
        })?;
        documents.insert(key, data);
    }

    Ok(documents)
}

fn decode_document(line: &str) -> Result<(EntryKey, EntryData), String> {
    let json = decode_line(line)?;
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let id = value.get("_id").ok_or_else(|| "missing _id".to_string())?;
    let key = EntryKey::parse(id).map_err(|e| e.to_string())?;
    let data = EntryData::parse(&value).map_err(|e| e.to_string())?;
    Ok((key, data))
}
