//! Newline framing over an async byte stream.
//!
//! # Streaming receive buffer
//!
//! TCP is a *stream* protocol: one `read()` may return half a line, or several
//! lines at once.  [`LineReader`] appends every read to a receive buffer and
//! calls [`chat_core::decode_line`] in a loop, draining one complete line at a
//! time and only going back to the socket when the codec reports
//! `InsufficientData`.
//!
//! Bytes of an unterminated line still buffered when the peer closes are
//! discarded; end-of-stream wins.
//!
//! # Portability note
//!
//! Both types are generic over `tokio::io::{AsyncRead, AsyncWrite}`, so they
//! work on `TcpStream` halves, in-memory duplex pipes, and test mocks alike.

use std::io;

use async_trait::async_trait;
use chat_core::{decode_line, encode_line, LineError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::application::{PeerReader, PeerWriter, RelayError};

/// Size of the temporary buffer handed to each `read()` call.
const READ_CHUNK: usize = 4096;

/// Reads `\n`-terminated lines from a byte stream.
pub struct LineReader<R> {
    inner: R,
    /// Accumulates bytes across multiple `read()` calls.
    recv_buf: Vec<u8>,
    read_tmp: Vec<u8>,
}

impl<R> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            recv_buf: Vec::with_capacity(READ_CHUNK),
            read_tmp: vec![0u8; READ_CHUNK],
        }
    }
}

#[async_trait]
impl<R> PeerReader for LineReader<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_line(&mut self) -> Result<Option<String>, RelayError> {
        loop {
            match decode_line(&self.recv_buf) {
                Ok((line, consumed)) => {
                    self.recv_buf.drain(..consumed);
                    return Ok(Some(line));
                }
                Err(LineError::InsufficientData { .. }) => {}
                Err(e) => return Err(e.into()),
            }

            let n = self.inner.read(&mut self.read_tmp).await?;
            if n == 0 {
                if !self.recv_buf.is_empty() {
                    debug!(
                        "discarding {} bytes of unterminated line at end-of-stream",
                        self.recv_buf.len()
                    );
                    self.recv_buf.clear();
                }
                return Ok(None);
            }
            self.recv_buf.extend_from_slice(&self.read_tmp[..n]);
        }
    }
}

/// Writes `\n`-terminated lines to a byte stream.
pub struct LineWriter<W> {
    inner: W,
}

impl<W> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W> PeerWriter for LineWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_line(&mut self, text: &str) -> io::Result<()> {
        // One buffer per line so `write_all` never interleaves text and
        // terminator across separate syscalls.
        let bytes = encode_line(text);
        self.inner.write_all(&bytes).await?;
        self.inner.flush().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
