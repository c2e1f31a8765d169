//! Application layer for chat-peer.
//!
//! The session loop lives here.  It depends only on the port traits declared
//! next to it (`PeerReader`, `PeerWriter`, `LocalInput`, `ChatDisplay`), so it
//! can run against real sockets and a terminal, or against in-memory stand-ins
//! in tests.

pub mod chat_session;

pub use chat_session::{
    run_session, run_session_with, ChatDisplay, LocalInput, PeerReader, PeerWriter, RelayError,
    SessionReport, SessionTransport,
};
