//! In-memory entry store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::{visible, EntryStore};
use crate::model::{EntryData, EntryKey};

/// Entry store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    documents: RwLock<HashMap<EntryKey, EntryData>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored document for `key`, without the visibility filter
    pub fn document(&self, key: &EntryKey) -> StoreResult<Option<EntryData>> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(documents.get(key).copied())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryStore for MemoryEntryStore {
    fn find(&self, key: &EntryKey) -> StoreResult<Option<EntryData>> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(visible(documents.get(key)))
    }

    fn upsert(&self, key: &EntryKey, data: &EntryData) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(|_| StoreError::lock_poisoned())?;
        documents.insert(key.clone(), *data);
        Ok(())
    }
}
