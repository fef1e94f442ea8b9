//! CLI command implementations
//!
//! `serve` boots the sync service over the configured backends and runs the
//! HTTP server on a tokio runtime. `replay` rebuilds a data directory's
//! entry log from its commit log.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use crate::commit::{
    read_commits, CommitLog, CommitLogError, FileCommitLog, MemoryCommitLog, COMMITS_FILE,
};
use crate::config::ServerConfig;
use crate::http_server::HttpServer;
use crate::observability::{init_tracing, Event};
use crate::realtime::Broadcaster;
use crate::store::{EntryStore, FileEntryStore, MemoryEntryStore, StoreError};
use crate::sync::{self, ReplayReport, SyncService};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Run one command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config } => serve(config.as_deref()),
        Command::Replay { data_dir } => {
            init_tracing(false, "info");
            let report = replay(&data_dir)?;
            let json = serde_json::json!({
                "applied": report.applied,
                "skipped": report.skipped,
            });
            writeln!(io::stdout(), "{}", json)?;
            Ok(())
        }
    }
}

/// Load configuration, boot the service and serve until ctrl-c
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    init_tracing(config.log_json, &config.log_filter);

    info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"));
    info!(
        event = %Event::ConfigLoaded,
        addr = %config.socket_addr(),
        data_dir = ?config.data_dir,
        request_timeout_ms = config.request_timeout_ms,
    );

    let service = build_service(&config)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;
    runtime
        .block_on(HttpServer::new(config, service).start())
        .map_err(|e| CliError::boot_failed(format!("Server failed: {}", e)))
}

/// Wire the sync service over file backends when `data_dir` is set,
/// in-memory backends otherwise
pub fn build_service(config: &ServerConfig) -> CliResult<SyncService> {
    let (store, commits): (Arc<dyn EntryStore>, Arc<dyn CommitLog>) = match &config.data_dir {
        Some(dir) => {
            let store = FileEntryStore::open(dir)
                .map_err(|e| CliError::boot_failed(format!("Failed to open entry store: {}", e)))?;
            let commits = FileCommitLog::open(dir)
                .map_err(|e| CliError::boot_failed(format!("Failed to open commit log: {}", e)))?;
            (Arc::new(store), Arc::new(commits))
        }
        None => (
            Arc::new(MemoryEntryStore::new()),
            Arc::new(MemoryCommitLog::new()),
        ),
    };

    Ok(SyncService::new(store, commits, Arc::new(Broadcaster::new())))
}

/// Rebuild `<data_dir>/entries.log` from `<data_dir>/commits.log`
pub fn replay(data_dir: &Path) -> CliResult<ReplayReport> {
    let commits_path = data_dir.join(COMMITS_FILE);
    if !commits_path.exists() {
        return Err(CliError::replay_failed(format!(
            "No commit log at {}",
            commits_path.display()
        )));
    }

    let commits = read_commits(&commits_path).map_err(|e| match e {
        CommitLogError::Io(io) => CliError::from(io),
        other => CliError::replay_failed(other.to_string()),
    })?;
    let store = FileEntryStore::recreate(data_dir).map_err(|e| match e {
        StoreError::Io(io) => CliError::from(io),
        other => CliError::replay_failed(other.to_string()),
    })?;

    sync::replay(&commits, &store).map_err(|e| CliError::replay_failed(e.to_string()))
}
