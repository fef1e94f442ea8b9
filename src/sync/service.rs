//! # Synchronization Service
//!
//! The update pipeline: parse, commit, read old value, upsert, publish.
//!
//! Each call is self-contained. There is no per-key serialization:
//! concurrent updates of one key may interleave their read and write
//! phases, and the last upsert wins.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{SyncError, SyncResult};
use crate::commit::{Commit, CommitLog};
use crate::model::{EntryData, EntryKey, GetRequest, ModelError, UpdateRequest};
use crate::observability::{Event, SyncMetrics};
use crate::realtime::{NotificationChannel, RealtimeError, StateChangedEvent};
use crate::store::EntryStore;

/// Result of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub entry_key: EntryKey,

    /// Visible value read before the write
    pub old_value: Option<EntryData>,

    pub new_value: EntryData,

    /// Listeners the state-changed event reached
    pub delivered: usize,

    /// Set when publishing failed. The mutation stands regardless.
    pub notification_error: Option<RealtimeError>,
}

impl UpdateOutcome {
    pub fn notified(&self) -> bool {
        self.notification_error.is_none()
    }
}

/// Synchronization service over injected collaborators
#[derive(Debug, Clone)]
pub struct SyncService {
    store: Arc<dyn EntryStore>,
    commits: Arc<dyn CommitLog>,
    channel: Arc<dyn NotificationChannel>,
    metrics: Arc<SyncMetrics>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        commits: Arc<dyn CommitLog>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self::with_metrics(store, commits, channel, Arc::new(SyncMetrics::new()))
    }

    pub fn with_metrics(
        store: Arc<dyn EntryStore>,
        commits: Arc<dyn CommitLog>,
        channel: Arc<dyn NotificationChannel>,
        metrics: Arc<SyncMetrics>,
    ) -> Self {
        Self {
            store,
            commits,
            channel,
            metrics,
        }
    }

    /// Notification channel listeners subscribe to
    pub fn channel(&self) -> &Arc<dyn NotificationChannel> {
        &self.channel
    }

    pub fn metrics(&self) -> &Arc<SyncMetrics> {
        &self.metrics
    }

    /// Parse and apply a raw mutation request.
    ///
    /// Parse failures touch neither the commit log nor the store.
    pub fn update_entry(&self, raw: &Value, client: Option<&str>) -> SyncResult<UpdateOutcome> {
        let request = UpdateRequest::parse(raw).map_err(|e| self.rejected(e))?;
        self.update(request, client)
    }

    /// Apply an already-parsed mutation request
    pub fn update(&self, request: UpdateRequest, client: Option<&str>) -> SyncResult<UpdateOutcome> {
        let commit = Commit::update(&request, client.map(str::to_string));
        self.commits
            .append(&commit)
            .map_err(|e| self.storage_failed("commit", e.into()))?;
        self.metrics.increment_updates_accepted();
        debug!(
            event = %Event::CommitAppended,
            key = %request.entry_key,
            client = client.unwrap_or("-"),
        );

        let UpdateRequest {
            entry_key,
            new_value,
        } = request;

        let old_value = self
            .store
            .find(&entry_key)
            .map_err(|e| self.storage_failed("find", e.into()))?;

        // The commit above stays in the log even if this write fails
        self.store
            .upsert(&entry_key, &new_value)
            .map_err(|e| self.storage_failed("upsert", e.into()))?;
        info!(
            event = %Event::EntryUpserted,
            key = %entry_key,
            amount = ?new_value.amount,
        );

        let event = StateChangedEvent::new(entry_key.clone(), old_value, new_value);
        let (delivered, notification_error) = match self.channel.publish(&event) {
            Ok(result) => {
                self.metrics.add_events_delivered(result.delivered as u64);
                debug!(
                    event = %Event::StateChangedPublished,
                    key = %entry_key,
                    delivered = result.delivered,
                    pruned = result.pruned,
                );
                (result.delivered, None)
            }
            Err(err) => {
                self.metrics.increment_notification_failures();
                warn!(event = %Event::NotificationFailed, key = %entry_key, error = %err);
                (0, Some(err))
            }
        };

        Ok(UpdateOutcome {
            entry_key,
            old_value,
            new_value,
            delivered,
            notification_error,
        })
    }

    /// Parse a raw read request and return the visible value.
    ///
    /// A miss yields `{amount: null}`.
    pub fn get_entry(&self, raw: &Value) -> SyncResult<EntryData> {
        let request = GetRequest::parse(raw).map_err(|e| self.rejected(e))?;
        self.get(&request.entry_key)
    }

    /// Visible value for `key`, or empty data on a miss
    pub fn get(&self, key: &EntryKey) -> SyncResult<EntryData> {
        let found = self
            .store
            .find(key)
            .map_err(|e| self.storage_failed("find", e.into()))?;
        self.metrics.increment_reads();
        Ok(found.unwrap_or_else(EntryData::empty))
    }

    fn rejected(&self, err: ModelError) -> SyncError {
        self.metrics.increment_requests_rejected();
        warn!(event = %Event::RequestRejected, error = %err);
        SyncError::InvalidRequest(err)
    }

    fn storage_failed(&self, stage: &'static str, err: SyncError) -> SyncError {
        self.metrics.increment_storage_failures();
        warn!(event = %Event::StorageFailed, stage, error = %err);
        err
    }
}
