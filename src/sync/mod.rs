//! # Synchronization
//!
//! The core of the server: every mutation is committed, applied to the
//! entry store and broadcast as a state-changed event, in that order.
//!
//! ## Guarantees
//!
//! - Parse errors never reach the commit log or the store
//! - Storage errors short-circuit before notification
//! - Notification errors never unwind an applied mutation
//!
//! ## Not guaranteed
//!
//! - Linearizability of concurrent updates to one key
//! - Atomicity across commit log and store: a commit may exist without its
//!   mutation if the upsert fails

pub mod errors;
pub mod replay;
pub mod service;

pub use errors::{ErrorKind, SyncError, SyncResult};
pub use replay::{replay, ReplayReport};
pub use service::{SyncService, UpdateOutcome};
