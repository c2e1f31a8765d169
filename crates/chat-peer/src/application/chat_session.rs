//! Chat session loop: two relays over one connection, first to finish wins.
//!
//! # Architecture
//!
//! ```text
//!               ┌──────────── inbound relay ────────────┐
//!  PeerReader ──┤ read line → "Peer: <text>"            ├──► ChatDisplay
//!               └────────────────────────────────────────┘
//!               ┌──────────── outbound relay ───────────┐
//!  LocalInput ──┤ exit? → close | write line → "You: .." ├──► PeerWriter
//!               └────────────────────────────────────────┘
//! ```
//!
//! Each relay runs in its own Tokio task and returns a [`TerminationCause`]
//! when it can no longer make progress.  The supervisor waits for whichever
//! task finishes first, aborts the other one (dropping its half of the
//! connection), and reports the winning cause.  A second cause raised at the
//! same moment is never observed.
//!
//! The loop depends only on the traits in this module.  Infrastructure
//! implements them for TCP sockets, stdin, and stdout; tests implement them
//! with scripted in-memory doubles.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{LineError, LocalCommand, Notice, Relay, SessionState, TerminationCause};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Error raised by a [`PeerReader`] for anything other than end-of-stream.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("read from peer failed: {0}")]
    Read(#[from] io::Error),
    #[error("peer sent a malformed line: {0}")]
    Framing(#[from] LineError),
}

/// Reads newline-delimited lines sent by the peer.
#[async_trait]
pub trait PeerReader: Send {
    /// Returns the next line without its terminator, or `Ok(None)` once the
    /// peer has closed its side of the connection.
    async fn read_line(&mut self) -> Result<Option<String>, RelayError>;
}

/// Writes newline-delimited lines to the peer.
#[async_trait]
pub trait PeerWriter: Send {
    /// Sends `text` followed by a single `\n`.
    async fn write_line(&mut self, text: &str) -> io::Result<()>;
}

/// Source of lines typed by the local user.
#[async_trait]
pub trait LocalInput: Send {
    /// Returns the next line, `Some(Err(_))` if input could not be read, or
    /// `None` once input is exhausted.
    async fn next_line(&mut self) -> Option<io::Result<String>>;
}

/// Where user-visible lines go (the terminal in production).
#[cfg_attr(test, mockall::automock)]
pub trait ChatDisplay: Send + Sync {
    /// Shows one line of output.
    fn show(&self, notice: &Notice);
}

/// An established connection that can be split into a reader and a writer.
pub trait SessionTransport {
    type Reader: PeerReader + 'static;
    type Writer: PeerWriter + 'static;

    /// The remote endpoint of the connection.
    fn peer_addr(&self) -> SocketAddr;

    /// Splits the connection into independently owned halves.
    fn into_halves(self) -> (Self::Reader, Self::Writer);
}

/// Summary returned once a session has closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Identifier used in log lines for this session.
    pub session_id: Uuid,
    /// The single cause that ended the session.
    pub cause: TerminationCause,
    /// Final lifecycle state; always [`SessionState::Closed`].
    pub state: SessionState,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Runs a chat session over an established connection until either relay
/// terminates it.
///
/// The session takes ownership of `conn`; it is closed exactly once before
/// this function returns.
pub async fn run_session<T, I>(conn: T, input: I, display: Arc<dyn ChatDisplay>) -> SessionReport
where
    T: SessionTransport,
    I: LocalInput + 'static,
{
    let peer = conn.peer_addr();
    let (reader, writer) = conn.into_halves();

    info!("chat session with {peer} started");
    let report = run_session_with(reader, writer, input, display).await;
    info!(
        "chat session {} with {peer} ended: {}",
        report.session_id, report.cause
    );

    report
}

/// Runs a chat session over an arbitrary reader/writer pair.
///
/// Both relays are spawned as Tokio tasks.  The first one to return decides
/// the [`TerminationCause`]; the other is aborted, which drops whatever half
/// of the connection it owns.  `Chat ended.` is shown last.
pub async fn run_session_with<R, W, I>(
    reader: R,
    writer: W,
    input: I,
    display: Arc<dyn ChatDisplay>,
) -> SessionReport
where
    R: PeerReader + 'static,
    W: PeerWriter + 'static,
    I: LocalInput + 'static,
{
    let session_id = Uuid::new_v4();
    let mut state = SessionState::Established;

    let mut inbound = tokio::spawn(inbound_relay(reader, Arc::clone(&display), session_id));
    let mut outbound = tokio::spawn(outbound_relay(
        input,
        writer,
        Arc::clone(&display),
        session_id,
    ));
    transition(&mut state, session_id);

    // First relay to finish is the termination signal.
    let (winner, result) = tokio::select! {
        res = &mut inbound => (Relay::Inbound, res),
        res = &mut outbound => (Relay::Outbound, res),
    };
    transition(&mut state, session_id);

    let cause = relay_outcome(winner, result);
    debug!("session {session_id}: {winner} relay ended the session ({cause})");
    // Only the winner explains the shutdown; a loser that also finished stays quiet.
    announce(&cause, display.as_ref());

    let loser = match winner {
        Relay::Inbound => outbound,
        Relay::Outbound => inbound,
    };
    loser.abort();
    // Awaiting the aborted task guarantees its connection half is dropped
    // before the session reports itself closed.
    match loser.await {
        Ok(late) => debug!("session {session_id}: discarding late cause ({late})"),
        Err(e) if e.is_cancelled() => {}
        Err(e) => warn!("session {session_id}: relay failed during teardown: {e}"),
    }
    transition(&mut state, session_id);

    display.show(&Notice::ChatEnded);

    SessionReport {
        session_id,
        cause,
        state,
    }
}

// ── Relays ────────────────────────────────────────────────────────────────────

/// Connection → local display.  Never writes to the connection.
async fn inbound_relay<R: PeerReader>(
    mut reader: R,
    display: Arc<dyn ChatDisplay>,
    session_id: Uuid,
) -> TerminationCause {
    let cause = loop {
        match reader.read_line().await {
            Ok(Some(line)) => {
                let text = line.trim();
                if !text.is_empty() {
                    display.show(&Notice::PeerMessage(text.to_string()));
                }
            }
            Ok(None) => {
                debug!("session {session_id}: peer closed the connection (EOF)");
                break TerminationCause::PeerClosed;
            }
            Err(e) => {
                warn!("session {session_id}: {e}");
                break TerminationCause::PeerDisconnected(e.to_string());
            }
        }
    };

    cause
}

/// Local input → connection.
async fn outbound_relay<I: LocalInput, W: PeerWriter>(
    mut input: I,
    mut writer: W,
    display: Arc<dyn ChatDisplay>,
    session_id: Uuid,
) -> TerminationCause {
    let cause = loop {
        let line = match input.next_line().await {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                debug!("session {session_id}: local input failed: {e}");
                break TerminationCause::InputClosed;
            }
            None => {
                debug!("session {session_id}: local input exhausted");
                break TerminationCause::InputClosed;
            }
        };

        match LocalCommand::parse(&line) {
            LocalCommand::Exit => break TerminationCause::ExitCommand,
            LocalCommand::Send(text) => {
                if let Err(e) = writer.write_line(text).await {
                    warn!("session {session_id}: send failed: {e}");
                    break TerminationCause::SendFailed(e.to_string());
                }
                display.show(&Notice::OwnMessage(text.to_string()));
            }
        }
    };

    cause
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Shows the winning cause's explanatory line, if it has one.
fn announce(cause: &TerminationCause, display: &dyn ChatDisplay) {
    if let Some(notice) = cause.notice() {
        display.show(&notice);
    }
}

fn relay_outcome(relay: Relay, result: Result<TerminationCause, JoinError>) -> TerminationCause {
    match result {
        Ok(cause) => cause,
        Err(e) => {
            warn!("{relay} relay task failed: {e}");
            TerminationCause::RelayFailed {
                relay,
                reason: e.to_string(),
            }
        }
    }
}

fn transition(state: &mut SessionState, session_id: Uuid) {
    match state.advance() {
        Ok(next) => {
            debug!("session {session_id}: {state} -> {next}");
            *state = next;
        }
        Err(e) => warn!("session {session_id}: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Replays a fixed script, then blocks forever (a quiet peer).
    struct ScriptedReader {
        script: VecDeque<Result<Option<String>, RelayError>>,
    }

    impl ScriptedReader {
        fn new(script: Vec<Result<Option<String>, RelayError>>) -> Self {
            Self {
                script: script.into(),
            }
        }

        fn silent() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl PeerReader for ScriptedReader {
        async fn read_line(&mut self) -> Result<Option<String>, RelayError> {
            match self.script.pop_front() {
                Some(step) => step,
                None => std::future::pending().await,
            }
        }
    }

    /// Replays typed lines, then blocks forever (a user who stopped typing).
    struct ScriptedInput {
        script: VecDeque<Option<io::Result<String>>>,
    }

    impl ScriptedInput {
        fn lines(lines: &[&str]) -> Self {
            Self {
                script: lines.iter().map(|l| Some(Ok(l.to_string()))).collect(),
            }
        }

        fn then_close(mut self) -> Self {
            self.script.push_back(None);
            self
        }
    }

    #[async_trait]
    impl LocalInput for ScriptedInput {
        async fn next_line(&mut self) -> Option<io::Result<String>> {
            match self.script.pop_front() {
                Some(step) => step,
                None => std::future::pending().await,
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingWriter {
        sent: Arc<Mutex<Vec<String>>>,
        should_fail: bool,
    }

    #[async_trait]
    impl PeerWriter for RecordingWriter {
        async fn write_line(&mut self, text: &str) -> io::Result<()> {
            if self.should_fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Mutex<Vec<Notice>>,
    }

    impl RecordingDisplay {
        fn shown(&self) -> Vec<Notice> {
            self.shown.lock().unwrap().clone()
        }
    }

    impl ChatDisplay for RecordingDisplay {
        fn show(&self, notice: &Notice) {
            self.shown.lock().unwrap().push(notice.clone());
        }
    }

    // ── Outbound relay ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_exit_command_ends_session_without_sending_it() {
        // Arrange
        let writer = RecordingWriter::default();
        let sent = Arc::clone(&writer.sent);
        let display = Arc::new(RecordingDisplay::default());

        // Act
        let report = run_session_with(
            ScriptedReader::silent(),
            writer,
            ScriptedInput::lines(&["hello", "  EXIT "]),
            display.clone(),
        )
        .await;

        // Assert
        assert_eq!(report.cause, TerminationCause::ExitCommand);
        assert_eq!(report.state, SessionState::Closed);
        assert_eq!(*sent.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(
            display.shown(),
            vec![
                Notice::OwnMessage("hello".into()),
                Notice::Closing,
                Notice::ChatEnded,
            ]
        );
    }

    #[tokio::test]
    async fn test_quit_shows_closing_then_chat_ended_in_order() {
        // Arrange: a strict mock so any extra line fails the test
        let mut display = MockChatDisplay::new();
        let mut seq = mockall::Sequence::new();
        display
            .expect_show()
            .withf(|notice| *notice == Notice::Closing)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        display
            .expect_show()
            .withf(|notice| *notice == Notice::ChatEnded)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        // Act
        let report = run_session_with(
            ScriptedReader::silent(),
            RecordingWriter::default(),
            ScriptedInput::lines(&["quit"]),
            Arc::new(display),
        )
        .await;

        // Assert
        assert_eq!(report.cause, TerminationCause::ExitCommand);
    }

    #[tokio::test]
    async fn test_lines_are_sent_verbatim_and_echoed() {
        let writer = RecordingWriter::default();
        let sent = Arc::clone(&writer.sent);
        let display = Arc::new(RecordingDisplay::default());

        run_session_with(
            ScriptedReader::silent(),
            writer,
            ScriptedInput::lines(&["  spaced out ", "second"]).then_close(),
            display.clone(),
        )
        .await;

        assert_eq!(
            *sent.lock().unwrap(),
            vec!["  spaced out ".to_string(), "second".to_string()]
        );
        assert_eq!(
            display.shown()[..2],
            [
                Notice::OwnMessage("  spaced out ".into()),
                Notice::OwnMessage("second".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_failure_ends_session_with_send_notice() {
        // Arrange
        let writer = RecordingWriter {
            should_fail: true,
            ..Default::default()
        };
        let display = Arc::new(RecordingDisplay::default());

        // Act
        let report = run_session_with(
            ScriptedReader::silent(),
            writer,
            ScriptedInput::lines(&["hello"]),
            display.clone(),
        )
        .await;

        // Assert: no local echo for a line that never left
        assert_eq!(
            report.cause,
            TerminationCause::SendFailed("broken pipe".into())
        );
        assert_eq!(
            display.shown(),
            vec![
                Notice::SendFailed("broken pipe".into()),
                Notice::ChatEnded,
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_input_ends_session_silently() {
        let display = Arc::new(RecordingDisplay::default());

        let report = run_session_with(
            ScriptedReader::silent(),
            RecordingWriter::default(),
            ScriptedInput::lines(&[]).then_close(),
            display.clone(),
        )
        .await;

        assert_eq!(report.cause, TerminationCause::InputClosed);
        assert_eq!(display.shown(), vec![Notice::ChatEnded]);
    }

    #[tokio::test]
    async fn test_input_error_ends_session_silently() {
        let display = Arc::new(RecordingDisplay::default());
        let input = ScriptedInput {
            script: VecDeque::from([Some(Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "stream did not contain valid UTF-8",
            )))]),
        };

        let report = run_session_with(
            ScriptedReader::silent(),
            RecordingWriter::default(),
            input,
            display.clone(),
        )
        .await;

        assert_eq!(report.cause, TerminationCause::InputClosed);
        assert_eq!(display.shown(), vec![Notice::ChatEnded]);
    }

    // ── Inbound relay ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_peer_eof_ends_session_without_error_notice() {
        // Arrange: one real line, one blank line, then a clean close
        let reader = ScriptedReader::new(vec![
            Ok(Some("hi there\r".into())),
            Ok(Some("   ".into())),
            Ok(None),
        ]);
        let display = Arc::new(RecordingDisplay::default());

        // Act
        let report = run_session_with(
            reader,
            RecordingWriter::default(),
            ScriptedInput::lines(&[]),
            display.clone(),
        )
        .await;

        // Assert: blank lines are not displayed
        assert_eq!(report.cause, TerminationCause::PeerClosed);
        assert_eq!(
            display.shown(),
            vec![Notice::PeerMessage("hi there".into()), Notice::ChatEnded]
        );
    }

    #[tokio::test]
    async fn test_read_error_shows_disconnect_notice() {
        let reader = ScriptedReader::new(vec![Err(RelayError::Read(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))]);
        let display = Arc::new(RecordingDisplay::default());

        let report = run_session_with(
            reader,
            RecordingWriter::default(),
            ScriptedInput::lines(&[]),
            display.clone(),
        )
        .await;

        assert!(matches!(report.cause, TerminationCause::PeerDisconnected(_)));
        assert_eq!(
            display.shown(),
            vec![Notice::PeerDisconnected, Notice::ChatEnded]
        );
    }

    #[tokio::test]
    async fn test_oversized_line_counts_as_disconnect() {
        let reader = ScriptedReader::new(vec![Err(RelayError::Framing(
            LineError::LineTooLong { max: 8 },
        ))]);
        let display = Arc::new(RecordingDisplay::default());

        let report = run_session_with(
            reader,
            RecordingWriter::default(),
            ScriptedInput::lines(&[]),
            display.clone(),
        )
        .await;

        assert_eq!(report.cause.relay(), Relay::Inbound);
        assert!(report.cause.is_failure());
    }

    #[tokio::test]
    async fn test_peer_sending_exit_is_just_a_message() {
        // Exit commands are recognised on local input only.
        let reader = ScriptedReader::new(vec![Ok(Some("exit".into())), Ok(None)]);
        let writer = RecordingWriter::default();
        let sent = Arc::clone(&writer.sent);
        let display = Arc::new(RecordingDisplay::default());

        let report = run_session_with(
            reader,
            writer,
            ScriptedInput::lines(&[]),
            display.clone(),
        )
        .await;

        assert_eq!(report.cause, TerminationCause::PeerClosed);
        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(display.shown()[0], Notice::PeerMessage("exit".into()));
    }

    // ── Supervisor ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_chat_ended_is_shown_exactly_once() {
        let display = Arc::new(RecordingDisplay::default());

        run_session_with(
            ScriptedReader::new(vec![Ok(None)]),
            RecordingWriter::default(),
            ScriptedInput::lines(&[]).then_close(),
            display.clone(),
        )
        .await;

        let ended = display
            .shown()
            .iter()
            .filter(|n| **n == Notice::ChatEnded)
            .count();
        assert_eq!(ended, 1);
    }

    #[tokio::test]
    async fn test_only_the_winning_cause_is_announced_when_both_relays_fail() {
        // Arrange: the peer resets and the first send fails, both without
        // waiting, so both relays have finished by the time select! looks
        let reader = ScriptedReader::new(vec![Err(RelayError::Read(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))]);
        let writer = RecordingWriter {
            should_fail: true,
            ..Default::default()
        };
        let display = Arc::new(RecordingDisplay::default());

        // Act
        let report = run_session_with(
            reader,
            writer,
            ScriptedInput::lines(&["hello"]),
            display.clone(),
        )
        .await;

        // Assert: one explanatory line, matching the reported cause
        let winner_notice = report.cause.notice().unwrap();
        assert_eq!(display.shown(), vec![winner_notice, Notice::ChatEnded]);
    }

    #[test]
    fn test_relay_outcome_passes_cause_through() {
        let cause = relay_outcome(Relay::Outbound, Ok(TerminationCause::ExitCommand));
        assert_eq!(cause, TerminationCause::ExitCommand);
    }
}
