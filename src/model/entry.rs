//! Entry identity and payload.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::errors::ModelResult;
use super::fields;
use super::schedule_date::ScheduleDate;

/// Identity of one entry: a user on a calendar day.
///
/// Used verbatim as the document identity in the entry store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryKey {
    #[serde(rename = "userID")]
    user_id: String,
    #[serde(rename = "scheduleDate")]
    schedule_date: ScheduleDate,
}

impl EntryKey {
    pub fn new(user_id: impl Into<String>, schedule_date: ScheduleDate) -> Self {
        Self {
            user_id: user_id.into(),
            schedule_date,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn schedule_date(&self) -> ScheduleDate {
        self.schedule_date
    }

    /// Parse `{userID, scheduleDate: {year, month, day}}`
    pub fn parse(input: &Value) -> ModelResult<Self> {
        Self::parse_at(input, "")
    }

    pub(crate) fn parse_at(input: &Value, path: &str) -> ModelResult<Self> {
        let obj = fields::object(input, path)?;
        let user_id = fields::require_str(obj, path, "userID")?;
        let date_path = fields::join(path, "scheduleDate");
        let date = fields::require(obj, path, "scheduleDate", "object")?;
        Ok(Self {
            user_id,
            schedule_date: ScheduleDate::parse_at(date, &date_path)?,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "userID": self.user_id,
            "scheduleDate": self.schedule_date.to_value(),
        })
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user_id, self.schedule_date)
    }
}

/// Payload of one entry.
///
/// `amount: None` means no recorded value. Reads also treat non-positive
/// amounts as no recorded value; writes store them untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct EntryData {
    pub amount: Option<i64>,
}

impl EntryData {
    pub fn new(amount: Option<i64>) -> Self {
        Self { amount }
    }

    pub fn with_amount(amount: i64) -> Self {
        Self {
            amount: Some(amount),
        }
    }

    /// The `{amount: null}` shape returned on a read miss
    pub fn empty() -> Self {
        Self { amount: None }
    }

    /// Whether a read may return this value (amount strictly positive)
    pub fn is_visible(&self) -> bool {
        matches!(self.amount, Some(amount) if amount > 0)
    }

    /// Parse `{amount}`; absent and null both mean no value
    pub fn parse(input: &Value) -> ModelResult<Self> {
        Self::parse_at(input, "")
    }

    pub(crate) fn parse_at(input: &Value, path: &str) -> ModelResult<Self> {
        let obj = fields::object(input, path)?;
        Ok(Self {
            amount: fields::optional_int(obj, path, "amount")?,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "amount": self.amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;
    use serde_json::json;

    fn key() -> EntryKey {
        EntryKey::new("u1", ScheduleDate::new(2024, 5, 1))
    }

    #[test]
    fn test_key_parse() {
        let parsed = EntryKey::parse(&json!({
            "userID": "u1",
            "scheduleDate": {"year": 2024, "month": 5, "day": 1}
        }))
        .unwrap();
        assert_eq!(parsed, key());
    }

    #[test]
    fn test_key_rejects_numeric_user_id() {
        let err = EntryKey::parse(&json!({
            "userID": 123,
            "scheduleDate": {"year": 2024, "month": 5, "day": 1}
        }))
        .unwrap_err();
        assert_eq!(err, ModelError::type_mismatch("userID", "string", "integer"));
    }

    #[test]
    fn test_key_nested_error_path() {
        let err = EntryKey::parse(&json!({
            "userID": "u1",
            "scheduleDate": {"year": 2024, "month": "may", "day": 1}
        }))
        .unwrap_err();
        assert_eq!(err.path(), "scheduleDate.month");
    }

    #[test]
    fn test_key_round_trip() {
        assert_eq!(EntryKey::parse(&key().to_value()).unwrap(), key());
        assert_eq!(serde_json::to_value(key()).unwrap(), key().to_value());
    }

    #[test]
    fn test_data_parse() {
        assert_eq!(EntryData::parse(&json!({"amount": 7})).unwrap(), EntryData::with_amount(7));
        assert_eq!(EntryData::parse(&json!({"amount": null})).unwrap(), EntryData::empty());
        assert_eq!(EntryData::parse(&json!({})).unwrap(), EntryData::empty());
    }

    #[test]
    fn test_data_rejects_string_amount() {
        let err = EntryData::parse(&json!({"amount": "five"})).unwrap_err();
        assert_eq!(err, ModelError::type_mismatch("amount", "integer or null", "string"));
    }

    #[test]
    fn test_data_serializes_null_amount() {
        assert_eq!(EntryData::empty().to_value(), json!({"amount": null}));
        assert_eq!(serde_json::to_value(EntryData::empty()).unwrap(), json!({"amount": null}));
    }

    #[test]
    fn test_visibility() {
        assert!(EntryData::with_amount(1).is_visible());
        assert!(!EntryData::with_amount(0).is_visible());
        assert!(!EntryData::with_amount(-3).is_visible());
        assert!(!EntryData::empty().is_visible());
    }

    #[test]
    fn test_display() {
        assert_eq!(key().to_string(), "u1@2024-05-01");
    }
}
