//! # HTTP Server Module
//!
//! axum transport for the sync service.
//!
//! # Endpoints
//!
//! - `GET  /health` - Health check
//! - `POST /entry/update-amount` - Apply a mutation
//! - `POST /entry/get` - Read one entry
//! - `GET  /entry/ws` - WebSocket: requests plus `state-changed` broadcasts
//! - `GET  /observability/metrics` - Operation counters

pub mod entry_routes;
pub mod entry_socket;
pub mod errors;
pub mod observability_routes;
pub mod server;

pub use entry_routes::{EntryState, CLIENT_ID_HEADER};
pub use entry_socket::SocketFrame;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
