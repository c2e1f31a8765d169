//! Protocol module containing the newline-delimited line codec.

pub mod codec;

pub use codec::{decode_line, encode_line, LineError, MAX_LINE_LEN};
