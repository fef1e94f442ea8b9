//! Entry WebSocket Handler
//!
//! One connection = one listener on the notification channel. Frames are
//! JSON `{event, ref?, data}`.
//!
//! Client events: `get`, `update`, `ping`.
//! Server events: `connected`, `get`, `update`, `state-changed`, `error`, `pong`.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::entry_routes::EntryState;
use super::errors::ApiError;
use crate::observability::Event;
use crate::realtime::{Listener, StateChangedEvent};

/// Event name of a broadcast state change
pub const STATE_CHANGED: &str = "state-changed";

/// One WebSocket frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketFrame {
    pub event: String,

    /// Opaque correlation value echoed on replies
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Value>,

    #[serde(default)]
    pub data: Value,
}

impl SocketFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            reference: None,
            data,
        }
    }

    fn reply_to(reference: Option<Value>, event: &str, data: Value) -> Self {
        Self {
            event: event.to_string(),
            reference,
            data,
        }
    }

    pub fn connected(connection_id: &str) -> Self {
        Self::new("connected", json!({ "connectionId": connection_id }))
    }

    pub fn state_changed(event: &StateChangedEvent) -> Self {
        Self::new(STATE_CHANGED, event.to_wire_format())
    }

    pub fn error(reference: Option<Value>, kind: &str, message: impl Into<String>) -> Self {
        Self::reply_to(
            reference,
            "error",
            json!({ "kind": kind, "message": message.into() }),
        )
    }

    fn from_api_error(reference: Option<Value>, err: &ApiError) -> Self {
        Self::error(reference, err.kind(), err.to_string())
    }
}

/// Handle WebSocket upgrade request
pub(crate) async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<EntryState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<EntryState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut listener = match state.service.channel().subscribe() {
        Ok(listener) => listener,
        Err(err) => {
            warn!(event = %Event::NotificationFailed, error = %err, "subscribe failed");
            let frame = SocketFrame::error(None, "INTERNAL", err.to_string());
            let _ = send_frame(&mut sender, &frame).await;
            return;
        }
    };
    let connection_id = listener.id().to_string();
    info!(event = %Event::ListenerJoined, connection = %connection_id);

    if send_frame(&mut sender, &SocketFrame::connected(&connection_id)).await {
        serve_connection(&state, &connection_id, &mut listener, &mut sender, &mut receiver).await;
    }

    if let Err(err) = state.service.channel().unsubscribe(listener.id()) {
        debug!(connection = %connection_id, error = %err, "unsubscribe failed");
    }
    info!(event = %Event::ListenerLeft, connection = %connection_id);
}

async fn serve_connection(
    state: &EntryState,
    connection_id: &str,
    listener: &mut Listener,
    sender: &mut SplitSink<WebSocket, Message>,
    receiver: &mut futures_util::stream::SplitStream<WebSocket>,
) {
    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = handle_frame(state, connection_id, &text).await;
                    if !send_frame(sender, &reply).await {
                        break;
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    if sender.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            event = listener.recv() => match event {
                Some(event) => {
                    if !send_frame(sender, &SocketFrame::state_changed(&event)).await {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}

/// Reply to one client frame
async fn handle_frame(state: &EntryState, connection_id: &str, text: &str) -> SocketFrame {
    let frame: SocketFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            return SocketFrame::from_api_error(None, &ApiError::InvalidBody(err.to_string()));
        }
    };
    let SocketFrame {
        event,
        reference,
        data,
    } = frame;

    match event.as_str() {
        "get" => match state.run(move |service| service.get_entry(&data)).await {
            Ok(entry) => SocketFrame::reply_to(reference, "get", entry.to_value()),
            Err(err) => SocketFrame::from_api_error(reference, &err),
        },
        "update" => {
            let client = connection_id.to_string();
            let result = state
                .run(move |service| service.update_entry(&data, Some(&client)))
                .await;
            match result {
                Ok(_) => SocketFrame::reply_to(reference, "update", json!({ "success": true })),
                Err(err) => SocketFrame::from_api_error(reference, &err),
            }
        }
        "ping" => SocketFrame::reply_to(reference, "pong", Value::Null),
        other => SocketFrame::error(
            reference,
            "INVALID_REQUEST",
            format!("Unknown event: {}", other),
        ),
    }
}

async fn send_frame(sender: &mut SplitSink<WebSocket, Message>, frame: &SocketFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(_) => false,
    }
}
