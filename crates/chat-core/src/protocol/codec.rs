//! Line codec for encoding and decoding chat messages.
//!
//! Wire format:
//! ```text
//! [utf8 text][\n]
//! ```
//! There is no header, length prefix, or escaping.  A `\r` immediately before
//! the `\n` is dropped so peers that send CRLF line endings interoperate.

use thiserror::Error;

/// Maximum number of bytes a single line may occupy before its `\n`.
///
/// A peer that streams more than this without a newline is treated as broken.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Errors that can occur while decoding a line from a receive buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// The buffer does not yet contain a complete `\n`-terminated line.
    #[error("insufficient data: no line terminator in {buffered} buffered bytes")]
    InsufficientData { buffered: usize },

    /// The line is longer than [`MAX_LINE_LEN`].
    #[error("line exceeds {max} bytes without a terminator")]
    LineTooLong { max: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes one chat line as it travels on the wire: the text followed by `\n`.
///
/// # Examples
///
/// ```rust
/// use chat_core::protocol::{decode_line, encode_line};
///
/// let bytes = encode_line("hello");
/// assert_eq!(bytes, b"hello\n");
/// let (line, consumed) = decode_line(&bytes).unwrap();
/// assert_eq!(line, "hello");
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_line(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(text.len() + 1);
    buf.extend_from_slice(text.as_bytes());
    buf.push(b'\n');
    buf
}

/// Decodes the first complete line from `buf`.
///
/// Returns the line text (terminator and any trailing `\r` removed) together
/// with the number of bytes consumed, so the caller can drain them from its
/// receive buffer.  Invalid UTF-8 sequences are replaced with `U+FFFD`.
///
/// # Errors
///
/// - [`LineError::InsufficientData`] if `buf` holds no `\n` yet.
/// - [`LineError::LineTooLong`] if the pending line is over [`MAX_LINE_LEN`].
pub fn decode_line(buf: &[u8]) -> Result<(String, usize), LineError> {
    let Some(newline) = buf.iter().position(|&b| b == b'\n') else {
        if buf.len() > MAX_LINE_LEN {
            return Err(LineError::LineTooLong { max: MAX_LINE_LEN });
        }
        return Err(LineError::InsufficientData {
            buffered: buf.len(),
        });
    };

    if newline > MAX_LINE_LEN {
        return Err(LineError::LineTooLong { max: MAX_LINE_LEN });
    }

    let mut body = &buf[..newline];
    if let Some((b'\r', rest)) = body.split_last() {
        body = rest;
    }

    Ok((String::from_utf8_lossy(body).into_owned(), newline + 1))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
