//! Runtime configuration types.
//!
//! [`ChatConfig`] is a plain struct with no file or environment access.  The
//! storage layer fills it from a TOML file and `main.rs` applies CLI
//! overrides on top.

use std::net::{Ipv4Addr, SocketAddr};

/// Default port of the liveness endpoint.
pub const DEFAULT_HEALTH_PORT: u16 = 8081;

/// Default `tracing` filter when `RUST_LOG` is not set.
///
/// Kept at `warn` so diagnostics do not interleave with the chat transcript.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// All runtime configuration for a chat peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Where the liveness endpoint binds in CI mode.
    pub health_addr: SocketAddr,
    /// `tracing` filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`, ...
    pub log_level: String,
}

impl Default for ChatConfig {
    /// | Field        | Default        |
    /// |--------------|----------------|
    /// | health_addr  | `0.0.0.0:8081` |
    /// | log_level    | `warn`         |
    fn default() -> Self {
        Self {
            health_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HEALTH_PORT)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
