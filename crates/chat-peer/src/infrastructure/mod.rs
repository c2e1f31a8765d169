//! Infrastructure layer for chat-peer.
//!
//! Contains OS-facing adapters: TCP establishment and line framing, the
//! console (stdin/stdout), the liveness HTTP endpoint, and config-file
//! storage.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `chat_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod console;
pub mod health;
pub mod network;
pub mod storage;
