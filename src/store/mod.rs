//! # Entry Store
//!
//! Read-one / upsert-one document store keyed by `EntryKey`.
//!
//! The store holds at most one document per key. Reads apply the
//! "amount > 0" visibility filter; writes store whatever they are given.

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::{FileEntryStore, ENTRIES_FILE};
pub use memory::MemoryEntryStore;

use crate::model::{EntryData, EntryKey};

/// Backend trait for the entry store
pub trait EntryStore: Send + Sync + std::fmt::Debug {
    /// Stored data for `key` if it exists and its amount is strictly positive
    fn find(&self, key: &EntryKey) -> StoreResult<Option<EntryData>>;

    /// Replace or create the document identified by `key`
    fn upsert(&self, key: &EntryKey, data: &EntryData) -> StoreResult<()>;
}

/// Read-time filter shared by the backends
pub(crate) fn visible(data: Option<&EntryData>) -> Option<EntryData> {
    data.filter(|d| d.is_visible()).copied()
}
