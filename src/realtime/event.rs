//! # Real-Time Events
//!
//! The state-changed event broadcast after every successful mutation.

use serde::Serialize;
use serde_json::Value;

use crate::model::{EntryData, EntryKey};

/// Broadcast after a successful mutation. Not persisted.
///
/// Wire shape: `{entryKey, oldValue: {amount}|null, newValue: {amount}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangedEvent {
    pub entry_key: EntryKey,

    /// Value read strictly before the write was applied
    pub old_value: Option<EntryData>,

    pub new_value: EntryData,
}

impl StateChangedEvent {
    pub fn new(entry_key: EntryKey, old_value: Option<EntryData>, new_value: EntryData) -> Self {
        Self {
            entry_key,
            old_value,
            new_value,
        }
    }

    /// Serialize to the broadcast payload
    pub fn to_wire_format(&self) -> Value {
        serde_json::json!({
            "entryKey": self.entry_key.to_value(),
            "oldValue": self.old_value.map(|v| v.to_value()),
            "newValue": self.new_value.to_value(),
        })
    }
}
