//! # chat-core
//!
//! Shared library for p2p-chat containing the newline wire codec, the rules
//! for recognising local commands, the session lifecycle, and the
//! user-visible notices printed by both peers.
//!
//! This crate has zero dependencies on sockets, terminals, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! p2p-chat connects exactly two people over one TCP connection.  One side
//! listens, the other dials, and afterwards both sides type lines that appear
//! on the other screen.
//!
//! - **`protocol`** – How lines travel over the network.  Each message is UTF-8
//!   text terminated by `\n`; the codec turns buffered bytes into complete
//!   lines and lines back into bytes.
//!
//! - **`domain`** – Pure rules with no I/O: which local input lines end the
//!   chat, how a session moves from established to closed, why it ended, and
//!   the exact wording of every status line shown to the user.

pub mod domain;
pub mod protocol;

// Re-export the most-used items at the crate root so callers can write
// `chat_core::is_exit_command` instead of the full module path.
pub use domain::command::{is_exit_command, LocalCommand};
pub use domain::notice::Notice;
pub use domain::session::{Relay, SessionState, SessionStateError, TerminationCause};
pub use protocol::codec::{decode_line, encode_line, LineError, MAX_LINE_LEN};
