//! # Key/Value Model
//!
//! Strongly-typed entry identity and payload, parsed from untrusted JSON.
//!
//! Parsing is the only validation layer: every inbound request goes through
//! `parse` and either yields a typed value or a `ModelError::TypeMismatch`
//! naming the offending field.

pub mod entry;
pub mod errors;
mod fields;
pub mod request;
pub mod schedule_date;

pub use entry::{EntryData, EntryKey};
pub use errors::{ModelError, ModelResult};
pub use request::{GetRequest, UpdateRequest};
pub use schedule_date::ScheduleDate;
