//! TOML and environment configuration for the target server.
//!
//! The client takes an explicit [`ServerConfig`] in its constructor; there
//! is no process-global client state. The struct can be built three ways:
//!
//! - literally, in code (tests do this);
//! - from a TOML file via [`ServerConfig::load`]:
//!
//!   ```toml
//!   host = "203.0.113.7"
//!   port = 27015
//!   password = "hunter2"
//!   connect_timeout_ms = 5000
//!   settle_timeout_ms = 500
//!   ```
//!
//! - from `RCON_HOST` / `RCON_PORT` / `RCON_PASSWORD` environment variables
//!   via [`ServerConfig::from_env`], for deployments that configure the
//!   process through the environment.
//!
//! Fields absent from the TOML file fall back to their
//! `#[serde(default = "...")]` values, so a minimal file with just `host`
//! and `password` works.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required environment variable is missing.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// An environment variable holds a value of the wrong shape.
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Connection parameters for one game server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host name or IP address of the game server.
    pub host: String,
    /// RCON TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared RCON credential.
    pub password: String,
    /// Overall timeout for connect, the auth reply, and the first command
    /// reply, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Inactivity window that ends multi-frame response aggregation, in
    /// milliseconds. Shorter than the overall timeout; raising it trades
    /// per-command latency for tolerance of slowly-arriving frames.
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
}

fn default_port() -> u16 {
    27015
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_settle_timeout_ms() -> u64 {
    500
}

impl ServerConfig {
    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Builds a config from `RCON_HOST`, `RCON_PORT`, and `RCON_PASSWORD`.
    ///
    /// `RCON_PORT` is optional and defaults to 27015; the timeouts always
    /// take their defaults here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or
    /// `RCON_PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host =
            std::env::var("RCON_HOST").map_err(|_| ConfigError::MissingEnv("RCON_HOST"))?;
        let password =
            std::env::var("RCON_PASSWORD").map_err(|_| ConfigError::MissingEnv("RCON_PASSWORD"))?;
        let port = match std::env::var("RCON_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "RCON_PORT",
                value: raw,
            })?,
            Err(_) => default_port(),
        };

        Ok(Self {
            host,
            port,
            password,
            connect_timeout_ms: default_connect_timeout_ms(),
            settle_timeout_ms: default_settle_timeout_ms(),
        })
    }

    /// `host:port` as a connect string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Overall timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Aggregation inactivity window as a [`Duration`].
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let cfg: ServerConfig =
            toml::from_str("host = \"198.51.100.1\"\npassword = \"secret\"").unwrap();
        assert_eq!(cfg.port, 27015);
        assert_eq!(cfg.connect_timeout_ms, 5_000);
        assert_eq!(cfg.settle_timeout_ms, 500);
    }

    #[test]
    fn test_full_toml_overrides_defaults() {
        let cfg: ServerConfig = toml::from_str(
            "host = \"198.51.100.1\"\nport = 27025\npassword = \"secret\"\n\
             connect_timeout_ms = 2000\nsettle_timeout_ms = 250",
        )
        .unwrap();
        assert_eq!(cfg.port, 27025);
        assert_eq!(cfg.connect_timeout(), Duration::from_millis(2000));
        assert_eq!(cfg.settle_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_toml_missing_host_is_parse_error() {
        let result: Result<ServerConfig, _> = toml::from_str("password = \"secret\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_addr_joins_host_and_port() {
        let cfg = ServerConfig {
            host: "203.0.113.7".to_string(),
            port: 27015,
            password: String::new(),
            connect_timeout_ms: 5_000,
            settle_timeout_ms: 500,
        };
        assert_eq!(cfg.addr(), "203.0.113.7:27015");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = ServerConfig::load(Path::new("/nonexistent/rcon.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
