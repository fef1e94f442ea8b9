//! Entry HTTP Routes
//!
//! Request/response endpoints over the sync service, plus the WebSocket
//! upgrade at `/entry/ws`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::entry_socket::websocket_handler;
use super::errors::{ApiError, ApiResult};
use crate::sync::{SyncResult, SyncService};

/// Header carrying the client identity recorded in commits
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Shared state of the entry routes
#[derive(Debug, Clone)]
pub struct EntryState {
    pub service: SyncService,
    pub request_timeout: Duration,
}

impl EntryState {
    pub fn new(service: SyncService, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    /// Run a blocking service call, waiting at most `request_timeout`.
    ///
    /// On timeout the call is detached, not cancelled: its commit, store
    /// write and broadcast still happen.
    pub async fn run<T, F>(&self, call: F) -> ApiResult<T>
    where
        F: FnOnce(SyncService) -> SyncResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = self.service.clone();
        let handle = tokio::task::spawn_blocking(move || call(service));

        match tokio::time::timeout(self.request_timeout, handle).await {
            Ok(Ok(result)) => result.map_err(ApiError::from),
            Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
            Err(_) => Err(ApiError::Timeout(self.request_timeout.as_millis() as u64)),
        }
    }
}

/// Create entry routes
pub fn entry_routes(state: Arc<EntryState>) -> Router {
    Router::new()
        .route("/update-amount", post(update_amount_handler))
        .route("/get", post(get_handler))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

fn client_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

/// Apply a mutation request
async fn update_amount_handler(
    State(state): State<Arc<EntryState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let raw = body(payload)?;
    let client = client_id(&headers);

    state
        .run(move |service| service.update_entry(&raw, client.as_deref()))
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Read the visible amount of one entry
async fn get_handler(
    State(state): State<Arc<EntryState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let raw = body(payload)?;
    let data = state.run(move |service| service.get_entry(&raw)).await?;
    Ok(Json(data.to_value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::MemoryCommitLog;
    use crate::model::{EntryData, EntryKey, ScheduleDate};
    use crate::realtime::{Broadcaster, NotificationChannel};
    use crate::store::{EntryStore, MemoryEntryStore, StoreResult};
    use axum::http::HeaderValue;

    /// Store whose writes take a while to land
    #[derive(Debug, Default)]
    struct SlowStore {
        inner: MemoryEntryStore,
    }

    impl EntryStore for SlowStore {
        fn find(&self, key: &EntryKey) -> StoreResult<Option<EntryData>> {
            self.inner.find(key)
        }

        fn upsert(&self, key: &EntryKey, data: &EntryData) -> StoreResult<()> {
            std::thread::sleep(Duration::from_millis(200));
            self.inner.upsert(key, data)
        }
    }

    fn state(timeout: Duration) -> EntryState {
        let service = SyncService::new(
            Arc::new(MemoryEntryStore::new()),
            Arc::new(MemoryCommitLog::new()),
            Arc::new(Broadcaster::new()),
        );
        EntryState::new(service, timeout)
    }

    #[test]
    fn test_client_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_id(&headers), None);

        headers.insert(CLIENT_ID_HEADER, HeaderValue::from_static("phone-1"));
        assert_eq!(client_id(&headers).as_deref(), Some("phone-1"));
    }

    #[tokio::test]
    async fn test_run_returns_service_result() {
        let state = state(Duration::from_secs(5));
        let raw = json!({"entryKey": {"userID": "u1", "scheduleDate": {"year": 2024, "month": 5, "day": 1}}});

        let data = state.run(move |service| service.get_entry(&raw)).await.unwrap();
        assert_eq!(data.amount, None);
    }

    #[tokio::test]
    async fn test_run_times_out_without_cancelling() {
        let state = state(Duration::from_millis(10));
        let (tx, rx) = std::sync::mpsc::channel();

        let err = state
            .run(move |_service| {
                std::thread::sleep(Duration::from_millis(100));
                let _ = tx.send(());
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Timeout(10)));
        // The detached call still finishes
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_timed_out_update_still_commits_stores_and_broadcasts() {
        let store = Arc::new(SlowStore::default());
        let commits = Arc::new(MemoryCommitLog::new());
        let channel = Arc::new(Broadcaster::new());
        let service = SyncService::new(store.clone(), commits.clone(), channel.clone());
        let state = EntryState::new(service, Duration::from_millis(1));
        let mut listener = channel.subscribe().unwrap();

        let key = EntryKey::new("u1", ScheduleDate::new(2024, 5, 1));
        let raw = json!({"entryKey": key.to_value(), "amount": 6});

        let err = state
            .run(move |service| service.update_entry(&raw, Some("conn-1")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout(1)));

        let event = tokio::time::timeout(Duration::from_secs(5), listener.recv())
            .await
            .expect("no state-changed event after timeout")
            .unwrap();
        assert_eq!(event.entry_key, key);
        assert_eq!(event.old_value, None);
        assert_eq!(event.new_value, EntryData::with_amount(6));

        assert_eq!(commits.len(), 1);
        assert_eq!(commits.commits()[0].client.as_deref(), Some("conn-1"));
        assert_eq!(store.find(&key).unwrap(), Some(EntryData::with_amount(6)));
    }
}
