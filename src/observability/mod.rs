//! Observability for the sync server
//!
//! - Structured logging through `tracing`
//! - Typed lifecycle/operation events
//! - Monotonic operation counters
//!
//! # Usage
//!
//! ```ignore
//! use situps::observability::{init_tracing, Event, SyncMetrics};
//!
//! init_tracing(false, "info");
//! tracing::info!(event = %Event::Serving, addr = "0.0.0.0:5000");
//!
//! let metrics = SyncMetrics::new();
//! metrics.increment_reads();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::init_tracing;
pub use metrics::{MetricsSnapshot, SyncMetrics};
