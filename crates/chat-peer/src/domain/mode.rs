//! Run-mode selection.
//!
//! The binary runs in exactly one mode per process: listen for a peer, dial a
//! peer, or serve the liveness endpoint without chatting (CI mode).

use thiserror::Error;

/// Error returned when the mode selectors do not pick exactly one mode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("specify --listen or --connect")]
    Missing,
    #[error("choose only one mode: --listen and --connect are mutually exclusive")]
    Conflicting,
}

/// What this process does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Accept one peer on the given bind address.
    Listen(String),
    /// Dial the peer at the given address.
    Connect(String),
    /// Serve the liveness endpoint only.
    Ci,
}

impl Mode {
    /// Resolves the raw selectors into a mode.
    ///
    /// CI mode wins over any address.  Empty addresses count as absent.
    ///
    /// # Errors
    ///
    /// [`ModeError::Missing`] when neither address is given,
    /// [`ModeError::Conflicting`] when both are.
    pub fn resolve(
        listen: Option<String>,
        connect: Option<String>,
        ci: bool,
    ) -> Result<Self, ModeError> {
        if ci {
            return Ok(Mode::Ci);
        }

        let listen = listen.filter(|addr| !addr.is_empty());
        let connect = connect.filter(|addr| !addr.is_empty());

        match (listen, connect) {
            (Some(addr), None) => Ok(Mode::Listen(addr)),
            (None, Some(addr)) => Ok(Mode::Connect(addr)),
            (Some(_), Some(_)) => Err(ModeError::Conflicting),
            (None, None) => Err(ModeError::Missing),
        }
    }
}
