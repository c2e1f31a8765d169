//! User-visible status lines.
//!
//! Both the establishment phase and the session loop print through
//! [`Notice`], so the transcript wording lives in one place.

use std::fmt;

/// One line of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Bound and waiting for the peer.
    Listening(String),
    /// A peer connected to our listener from the given address.
    PeerConnected(String),
    /// About to dial the given address.
    Connecting(String),
    /// Dialing succeeded; the address is the peer's resolved endpoint.
    Connected(String),
    /// A line received from the peer.
    PeerMessage(String),
    /// Local echo of a line that was sent.
    OwnMessage(String),
    /// Reading from the peer failed.
    PeerDisconnected,
    /// The local user asked to leave.
    Closing,
    /// Sending a line failed with the given error.
    SendFailed(String),
    /// The session is over.
    ChatEnded,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Listening(addr) => write!(f, "⏳ Listening on {addr}..."),
            Notice::PeerConnected(addr) => write!(f, "✓ Peer connected from {addr}"),
            Notice::Connecting(addr) => write!(f, "⏳ Connecting to {addr}..."),
            Notice::Connected(addr) => write!(f, "✓ Connected to {addr}"),
            Notice::PeerMessage(text) => write!(f, "Peer: {text}"),
            Notice::OwnMessage(text) => write!(f, "You: {text}"),
            Notice::PeerDisconnected => f.write_str("✗ Peer disconnected"),
            Notice::Closing => f.write_str("✓ Closing connection..."),
            Notice::SendFailed(err) => write!(f, "✗ Failed to send: {err}"),
            Notice::ChatEnded => f.write_str("Chat ended."),
        }
    }
}
