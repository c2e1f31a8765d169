//! Console adapters: local input from stdin, output to stdout.
//!
//! # Why a plain thread for stdin?
//!
//! Reading a terminal is a blocking call that cannot be cancelled.  If it ran
//! on the Tokio runtime, shutting the runtime down would wait for the user to
//! press Enter.  Instead a detached OS thread reads lines and forwards them
//! over a bounded channel.  The thread is never joined; when the chat ends the
//! process exits and the thread goes with it.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use chat_core::Notice;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::{ChatDisplay, LocalInput};

/// Lines buffered between the stdin thread and the outbound relay.
pub const INPUT_CHANNEL_CAPACITY: usize = 16;

/// Local input delivered over a channel.
///
/// Production code builds it with [`ChannelInput::stdin`]; tests build it
/// with [`ChannelInput::new`] and push lines through the sender.
pub struct ChannelInput {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl ChannelInput {
    pub fn new(rx: mpsc::Receiver<io::Result<String>>) -> Self {
        Self { rx }
    }

    /// Starts the detached stdin reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn stdin() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);

        // The JoinHandle is dropped on purpose: the thread is detached.
        std::thread::Builder::new()
            .name("chat-stdin".to_string())
            .spawn(move || forward_lines(io::stdin().lock(), &tx))?;

        Ok(Self::new(rx))
    }
}

#[async_trait]
impl LocalInput for ChannelInput {
    async fn next_line(&mut self) -> Option<io::Result<String>> {
        self.rx.recv().await
    }
}

/// Forwards lines from a blocking reader until it ends, fails, or nobody is
/// listening any more.
///
/// Line terminators (`\n`, `\r\n`) are stripped.  Bytes that are not valid
/// UTF-8 are replaced with `U+FFFD`, matching how peer lines are decoded;
/// only a real read error stops the thread.
fn forward_lines<B: BufRead>(mut input: B, tx: &mpsc::Sender<io::Result<String>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let line = match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => Ok(decode_typed_line(&buf)),
            Err(e) => Err(e),
        };
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() {
            debug!("console input channel closed; stdin reader exiting");
            return;
        }
        if failed {
            break;
        }
    }
    debug!("stdin reached end of input");
}

fn decode_typed_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Prints every notice as one line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutDisplay;

impl ChatDisplay for StdoutDisplay {
    fn show(&self, notice: &Notice) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{notice}").and_then(|()| out.flush()) {
            debug!("failed to write to stdout: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
