//! Local input commands.
//!
//! Only the local side interprets commands.  Text that arrives from the peer
//! is always displayed verbatim, even if it reads "exit".

/// Words that end the chat when typed locally.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Returns `true` if `line` asks to leave the chat.
///
/// The check trims surrounding whitespace and ignores ASCII case, so
/// `"  Exit\n"` and `"QUIT"` both match while `"exiting"` does not.
pub fn is_exit_command(line: &str) -> bool {
    let word = line.trim();
    EXIT_WORDS
        .iter()
        .any(|exit| word.eq_ignore_ascii_case(exit))
}

/// What the outbound relay should do with one line of local input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand<'a> {
    /// Close the connection without sending anything.
    Exit,
    /// Send the line to the peer unchanged.
    Send(&'a str),
}

impl<'a> LocalCommand<'a> {
    /// Classifies a line read from local input.
    pub fn parse(line: &'a str) -> Self {
        if is_exit_command(line) {
            LocalCommand::Exit
        } else {
            LocalCommand::Send(line)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
