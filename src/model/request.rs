//! Inbound request shapes.

use serde::Serialize;
use serde_json::Value;

use super::entry::{EntryData, EntryKey};
use super::errors::{ModelError, ModelResult};
use super::fields;

/// A mutation request.
///
/// Accepts `{entryKey, newValue: {amount}}` and the flat
/// `{entryKey, amount}` form. Always serializes to the former.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub entry_key: EntryKey,
    pub new_value: EntryData,
}

impl UpdateRequest {
    pub fn new(entry_key: EntryKey, new_value: EntryData) -> Self {
        Self {
            entry_key,
            new_value,
        }
    }

    pub fn parse(input: &Value) -> ModelResult<Self> {
        let obj = fields::object(input, "")?;
        let entry_key = EntryKey::parse_at(fields::require(obj, "", "entryKey", "object")?, "entryKey")?;

        let new_value = if let Some(new_value) = obj.get("newValue") {
            EntryData::parse_at(new_value, "newValue")?
        } else if obj.contains_key("amount") {
            EntryData::new(fields::optional_int(obj, "", "amount")?)
        } else {
            return Err(ModelError::missing("newValue", "object"));
        };

        Ok(Self {
            entry_key,
            new_value,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "entryKey": self.entry_key.to_value(),
            "newValue": self.new_value.to_value(),
        })
    }
}

/// A read request: `{entryKey}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequest {
    pub entry_key: EntryKey,
}

impl GetRequest {
    pub fn parse(input: &Value) -> ModelResult<Self> {
        let obj = fields::object(input, "")?;
        let entry_key = EntryKey::parse_at(fields::require(obj, "", "entryKey", "object")?, "entryKey")?;
        Ok(Self { entry_key })
    }
}
