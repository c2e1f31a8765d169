//! Domain layer for chat-peer.
//!
//! Plain configuration and mode-selection types.  Nothing here performs I/O;
//! the infrastructure layer and `main.rs` populate these from the CLI and the
//! config file.

pub mod config;
pub mod mode;

pub use config::ChatConfig;
pub use mode::{Mode, ModeError};
