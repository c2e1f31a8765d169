//! chat-peer library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! ```text
//! [chat-peer]
//!   ├── domain/           Plain types: ChatConfig, Mode
//!   ├── application/      The chat session loop and its port traits
//!   └── infrastructure/
//!         ├── network/    Listen/dial over TCP, newline framing on sockets
//!         ├── console     stdin reader thread, stdout display
//!         ├── health      GET /health liveness endpoint (CI mode)
//!         └── storage/    TOML config file loading
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
