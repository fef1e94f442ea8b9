//! CLI module for the sync server
//!
//! Provides command-line interface for:
//! - serve: Boot the sync service and serve HTTP/WebSocket
//! - replay: Rebuild the entry log from the commit log

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_service, replay, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
