//! Network infrastructure for chat-peer.
//!
//! # Sub-modules
//!
//! - **`establish`** – Produces the single TCP connection a session runs on,
//!   either by accepting exactly one inbound peer (`passive_listen`) or by
//!   dialing out once (`active_dial`).
//!
//! - **`wire`** – Newline framing on top of a byte stream: `LineReader` and
//!   `LineWriter` implement the session loop's `PeerReader`/`PeerWriter`
//!   ports using the `chat_core` codec.

pub mod establish;
pub mod wire;

pub use establish::{active_dial, passive_listen, EstablishError, PeerConnection, PeerListener};
pub use wire::{LineReader, LineWriter};
