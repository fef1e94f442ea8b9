//! CLI argument definitions using clap
//!
//! Commands:
//! - situps serve [--config <path>]
//! - situps replay --data-dir <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Situps - real-time sync server for daily exercise counts
#[derive(Parser, Debug)]
#[command(name = "situps")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP/WebSocket server
    Serve {
        /// Path to configuration file. Defaults to config.<SITUPS_SERVER_MODE>.local.json
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rebuild the entry log of a data directory from its commit log
    Replay {
        /// Data directory holding commits.log
        #[arg(long)]
        data_dir: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["situps", "serve"]).unwrap();
        assert_eq!(cli.command, Command::Serve { config: None });

        let cli = Cli::try_parse_from(["situps", "serve", "--config", "c.json"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Serve {
                config: Some(PathBuf::from("c.json"))
            }
        );
    }

    #[test]
    fn test_parse_replay_requires_data_dir() {
        assert!(Cli::try_parse_from(["situps", "replay"]).is_err());

        let cli = Cli::try_parse_from(["situps", "replay", "--data-dir", "/tmp/d"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Replay {
                data_dir: PathBuf::from("/tmp/d")
            }
        );
    }
}
