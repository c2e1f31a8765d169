//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads an optional TOML file and turns it into a
//! [`crate::domain::ChatConfig`].  Missing keys fall back to the built-in
//! defaults, so an empty file is valid.

pub mod config;
