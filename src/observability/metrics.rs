//! Sync metrics
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of the sync service
///
/// All counters use Relaxed atomics; readers see eventually-consistent values.
#[derive(Debug, Default)]
pub struct SyncMetrics {
    /// Updates that reached the commit log
    updates_accepted: AtomicU64,
    /// Requests that failed to parse
    requests_rejected: AtomicU64,
    /// Store or commit log failures
    storage_failures: AtomicU64,
    /// Publishes that failed after a successful mutation
    notification_failures: AtomicU64,
    /// Successful reads
    reads: AtomicU64,
    /// Events handed to listeners
    events_delivered: AtomicU64,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_updates_accepted(&self) {
        self.updates_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notification_failures(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reads(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Add the listener count of one publish
    pub fn add_events_delivered(&self, count: u64) {
        self.events_delivered.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            updates_accepted: self.updates_accepted.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub updates_accepted: u64,
    pub requests_rejected: u64,
    pub storage_failures: u64,
    pub notification_failures: u64,
    pub reads: u64,
    pub events_delivered: u64,
}
