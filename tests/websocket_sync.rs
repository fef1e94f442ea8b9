//! WebSocket clients against a live server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use situps::commit::MemoryCommitLog;
use situps::config::ServerConfig;
use situps::http_server::HttpServer;
use situps::realtime::Broadcaster;
use situps::store::MemoryEntryStore;
use situps::sync::SyncService;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> (SocketAddr, Arc<MemoryCommitLog>, Arc<Broadcaster>) {
    let commits = Arc::new(MemoryCommitLog::new());
    let channel = Arc::new(Broadcaster::new());
    let service = SyncService::new(
        Arc::new(MemoryEntryStore::new()),
        commits.clone(),
        channel.clone(),
    );
    let router = HttpServer::build_router(&ServerConfig::default(), service);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, commits, channel)
}

/// Connect and consume the `connected` frame; returns the connection id
async fn connect(addr: SocketAddr) -> (Client, String) {
    let (mut ws, _) = connect_async(format!("ws://{}/entry/ws", addr)).await.unwrap();
    let hello = next_frame(&mut ws).await;
    assert_eq!(hello["event"], "connected");
    let id = hello["data"]["connectionId"].as_str().unwrap().to_string();
    (ws, id)
}

async fn next_frame(ws: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .unwrap()
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Read frames until one with `event` arrives, returning it
async fn frame_with_event(ws: &mut Client, event: &str) -> Value {
    loop {
        let frame = next_frame(ws).await;
        if frame["event"] == event {
            return frame;
        }
    }
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(Message::Text(frame.to_string())).await.unwrap();
}

fn key_json() -> Value {
    json!({"userID": "u1", "scheduleDate": {"year": 2024, "month": 5, "day": 1}})
}

#[tokio::test]
async fn test_ping_pong_echoes_ref() {
    let (addr, _, _) = spawn_server().await;
    let (mut ws, _) = connect(addr).await;

    send(&mut ws, json!({"event": "ping", "ref": "r1"})).await;
    let reply = next_frame(&mut ws).await;
    assert_eq!(reply["event"], "pong");
    assert_eq!(reply["ref"], "r1");
}

#[tokio::test]
async fn test_update_broadcasts_to_all_connections() {
    let (addr, commits, _) = spawn_server().await;
    let (mut writer, writer_id) = connect(addr).await;
    let (mut watcher, _) = connect(addr).await;

    send(
        &mut writer,
        json!({"event": "update", "ref": 1, "data": {"entryKey": key_json(), "newValue": {"amount": 3}}}),
    )
    .await;

    let reply = frame_with_event(&mut writer, "update").await;
    assert_eq!(reply["ref"], 1);
    assert_eq!(reply["data"], json!({"success": true}));

    let expected = json!({"entryKey": key_json(), "oldValue": null, "newValue": {"amount": 3}});

    // The originating connection receives its own broadcast too
    let own = frame_with_event(&mut writer, "state-changed").await;
    assert_eq!(own["data"], expected);

    let other = frame_with_event(&mut watcher, "state-changed").await;
    assert_eq!(other["data"], expected);

    assert_eq!(commits.commits()[0].client.as_deref(), Some(writer_id.as_str()));
}

#[tokio::test]
async fn test_get_over_socket() {
    let (addr, _, _) = spawn_server().await;
    let (mut ws, _) = connect(addr).await;

    send(&mut ws, json!({"event": "update", "data": {"entryKey": key_json(), "amount": 5}})).await;
    frame_with_event(&mut ws, "update").await;

    send(&mut ws, json!({"event": "get", "ref": "g", "data": {"entryKey": key_json()}})).await;
    let reply = frame_with_event(&mut ws, "get").await;
    assert_eq!(reply["ref"], "g");
    assert_eq!(reply["data"], json!({"amount": 5}));
}

#[tokio::test]
async fn test_invalid_frames_get_error_replies() {
    let (addr, commits, _) = spawn_server().await;
    let (mut ws, _) = connect(addr).await;

    ws.send(Message::Text("not json".to_string())).await.unwrap();
    let reply = next_frame(&mut ws).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["data"]["kind"], "INVALID_REQUEST");

    send(&mut ws, json!({"event": "update", "ref": 2, "data": {"entryKey": {"userID": 1}}})).await;
    let reply = next_frame(&mut ws).await;
    assert_eq!(reply["event"], "error");
    assert_eq!(reply["ref"], 2);
    assert_eq!(reply["data"]["kind"], "INVALID_REQUEST");

    send(&mut ws, json!({"event": "delete"})).await;
    let reply = next_frame(&mut ws).await;
    assert_eq!(reply["event"], "error");

    assert!(commits.is_empty());
}

#[tokio::test]
async fn test_closed_connection_unsubscribes() {
    let (addr, _, channel) = spawn_server().await;
    let (mut ws, _) = connect(addr).await;
    assert_eq!(channel.listener_count(), 1);

    ws.close(None).await.unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while channel.listener_count() != 0 {
        assert!(tokio::time::Instant::now() < deadline, "listener not removed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
