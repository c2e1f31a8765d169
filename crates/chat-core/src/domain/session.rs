//! Session lifecycle and termination causes.
//!
//! A session covers one established connection from handshake completion to
//! connection close:
//!
//! ```text
//! Established ──► Active ──► Terminating ──► Closed
//! ```
//!
//! `Closed` is terminal; a session is never reused or resumed.

use std::fmt;

use thiserror::Error;

use crate::domain::notice::Notice;

/// Error returned when a lifecycle transition is attempted from `Closed`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionStateError {
    #[error("session is closed and cannot advance")]
    AlreadyClosed,
}

/// The lifecycle state of a single chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The connection exists but the relays have not started.
    #[default]
    Established,
    /// Both relays are running.
    Active,
    /// One relay has raised termination; the connection is being released.
    Terminating,
    /// The connection has been released.
    Closed,
}

impl SessionState {
    /// Returns the state that follows `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStateError::AlreadyClosed`] when called on `Closed`.
    pub fn advance(self) -> Result<Self, SessionStateError> {
        match self {
            SessionState::Established => Ok(SessionState::Active),
            SessionState::Active => Ok(SessionState::Terminating),
            SessionState::Terminating => Ok(SessionState::Closed),
            SessionState::Closed => Err(SessionStateError::AlreadyClosed),
        }
    }

    /// Returns `true` once the connection has been released.
    pub fn is_closed(self) -> bool {
        self == SessionState::Closed
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Established => "established",
            SessionState::Active => "active",
            SessionState::Terminating => "terminating",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// The two relay directions of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    /// Connection → local display.
    Inbound,
    /// Local input → connection.
    Outbound,
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relay::Inbound => f.write_str("inbound"),
            Relay::Outbound => f.write_str("outbound"),
        }
    }
}

/// Why a session ended.  Exactly one cause wins per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationCause {
    /// The peer closed its side cleanly (end-of-stream).
    PeerClosed,
    /// Reading from the peer failed for any reason other than end-of-stream.
    PeerDisconnected(String),
    /// The local user typed an exit command.
    ExitCommand,
    /// Local input ended or could not be read.
    InputClosed,
    /// Writing a line to the peer failed.
    SendFailed(String),
    /// A relay task stopped without reporting a cause (panic or runtime
    /// cancellation).
    RelayFailed { relay: Relay, reason: String },
}

impl TerminationCause {
    /// The relay direction that raised this cause.
    pub fn relay(&self) -> Relay {
        match self {
            TerminationCause::PeerClosed | TerminationCause::PeerDisconnected(_) => Relay::Inbound,
            TerminationCause::ExitCommand
            | TerminationCause::InputClosed
            | TerminationCause::SendFailed(_) => Relay::Outbound,
            TerminationCause::RelayFailed { relay, .. } => *relay,
        }
    }

    /// The explanatory line the terminating relay shows, if any.
    ///
    /// A clean peer close and exhausted local input end silently.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            TerminationCause::PeerDisconnected(_) => Some(Notice::PeerDisconnected),
            TerminationCause::ExitCommand => Some(Notice::Closing),
            TerminationCause::SendFailed(reason) => Some(Notice::SendFailed(reason.clone())),
            TerminationCause::PeerClosed
            | TerminationCause::InputClosed
            | TerminationCause::RelayFailed { .. } => None,
        }
    }

    /// Returns `true` for causes that stem from an I/O failure rather than a
    /// normal close.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TerminationCause::PeerDisconnected(_)
                | TerminationCause::SendFailed(_)
                | TerminationCause::RelayFailed { .. }
        )
    }
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationCause::PeerClosed => f.write_str("peer closed the connection"),
            TerminationCause::PeerDisconnected(reason) => write!(f, "peer disconnected: {reason}"),
            TerminationCause::ExitCommand => f.write_str("local exit command"),
            TerminationCause::InputClosed => f.write_str("local input closed"),
            TerminationCause::SendFailed(reason) => write!(f, "send failed: {reason}"),
            TerminationCause::RelayFailed { relay, reason } => {
                write!(f, "{relay} relay failed: {reason}")
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
