//! Server Configuration
//!
//! JSON configuration for the sync server. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration.
//!
//! Without an explicit path the file is `config.<mode>.local.json` in the
//! working directory, where `<mode>` comes from `SITUPS_SERVER_MODE`
//! (default `development`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the server mode
pub const SERVER_MODE_ENV: &str = "SITUPS_SERVER_MODE";

/// Mode used when `SITUPS_SERVER_MODE` is unset
pub const DEFAULT_SERVER_MODE: &str = "development";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly named file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Sync server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 5000)
    pub port: u16,

    /// CORS allowed origins. Empty means permissive.
    pub cors_origins: Vec<String>,

    /// Directory for the entry and commit logs. In-memory backends when absent.
    pub data_dir: Option<PathBuf>,

    /// Per-request timeout in milliseconds (default: 5000)
    pub request_timeout_ms: u64,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Log filter used when `RUST_LOG` is unset (default: "info")
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            data_dir: None,
            request_timeout_ms: 5000,
            log_json: false,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load from `explicit`, or from the mode-derived default file.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mode = std::env::var(SERVER_MODE_ENV).ok();
        Self::resolve(explicit, mode.as_deref())
    }

    /// Load with an explicit server mode instead of reading the environment.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn resolve(explicit: Option<&Path>, mode: Option<&str>) -> ConfigResult<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => {
                let path = default_path(mode.unwrap_or(DEFAULT_SERVER_MODE));
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate one config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}

/// Default config file for a server mode
pub fn default_path(mode: &str) -> PathBuf {
    PathBuf::from(format!("config.{}.local.json", mode))
}
