//! TOML-based configuration for chat-peer.
//!
//! The file is optional and only read when `--config <PATH>` (or
//! `CHAT_CONFIG`) is given:
//!
//! ```toml
//! [health]
//! bind_address = "0.0.0.0:8081"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when absent, so partial files work.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::config::{ChatConfig, DEFAULT_HEALTH_PORT, DEFAULT_LOG_LEVEL};

/// Error type for configuration file operations.
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

    /// The health bind address is not a valid `ip:port`.
    #[error("invalid health bind address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

// ── File schema ───────────────────────────────────────────────────────────────

/// Top-level layout of the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub health: HealthSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[health]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HealthSection {
    /// `ip:port` the liveness endpoint binds to in CI mode.
    #[serde(default = "default_health_bind")]
    pub bind_address: String,
}

/// `[logging]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_health_bind() -> String {
    format!("0.0.0.0:{DEFAULT_HEALTH_PORT}")
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            bind_address: default_health_bind(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ConfigFile {
    /// Validates the file contents and converts them to a [`ChatConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `health.bind_address` is not
    /// a literal socket address.
    pub fn into_chat_config(self) -> Result<ChatConfig, ConfigError> {
        let health_addr: SocketAddr =
            self.health
                .bind_address
                .parse()
                .map_err(|source| ConfigError::InvalidAddress {
                    value: self.health.bind_address.clone(),
                    source,
                })?;

        Ok(ChatConfig {
            health_addr,
            log_level: self.logging.level,
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses config TOML text.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed TOML or unknown keys,
/// [`ConfigError::InvalidAddress`] for a bad health address.
pub fn parse_config(content: &str) -> Result<ChatConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;
    file.into_chat_config()
}

/// Loads the config file at `path`.
///
/// Unlike a default-location lookup, an explicitly named file must exist.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise as
/// [`parse_config`].
pub fn load_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
