//! Calendar day without timezone semantics.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::errors::ModelResult;
use super::fields;

/// A calendar day.
///
/// Only the integer types of the components are checked. `month` and `day`
/// are not range-checked, so `{2024, 13, 40}` is accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScheduleDate {
    year: i64,
    month: i64,
    day: i64,
}

impl ScheduleDate {
    pub fn new(year: i64, month: i64, day: i64) -> Self {
        Self { year, month, day }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> i64 {
        self.month
    }

    pub fn day(&self) -> i64 {
        self.day
    }

    /// Parse `{year, month, day}`
    pub fn parse(input: &Value) -> ModelResult<Self> {
        Self::parse_at(input, "")
    }

    pub(crate) fn parse_at(input: &Value, path: &str) -> ModelResult<Self> {
        let obj = fields::object(input, path)?;
        Ok(Self {
            year: fields::require_int(obj, path, "year")?,
            month: fields::require_int(obj, path, "month")?,
            day: fields::require_int(obj, path, "day")?,
        })
    }

    /// Serialize back to `{year, month, day}`
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "year": self.year,
            "month": self.month,
            "day": self.day,
        })
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
