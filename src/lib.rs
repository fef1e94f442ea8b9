//! situps - real-time sync server for daily exercise counts
//!
//! Every accepted update is appended to a commit log, upserted into the
//! entry store and broadcast to all connected clients.

pub mod checksum;
pub mod cli;
pub mod commit;
pub mod config;
pub mod http_server;
mod line_log;
pub mod model;
pub mod observability;
pub mod realtime;
pub mod store;
pub mod sync;
