//! Sequential record streams for persisting real-valued fields.
//!
//! Every `write_*`/`read_*` call on a stream is one *statement*: a binary
//! statement is a run of little-endian `f64` values with no framing, a text
//! statement starts on a fresh record (line).

pub mod binary;
pub mod format;
pub mod text;

pub use binary::{BinaryReader, BinaryWriter};
pub use format::{EditFormat, EditKind, TextFormat, parse_real};
pub use text::{TextReader, TextWriter};

use thiserror::Error;

/// Result type for stream statements.
pub type StreamResult<T> = Result<T, StreamError>;

/// Failure of a single write/read statement.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of stream: expected {expected} values, got {got}")]
    UnexpectedEof { expected: usize, got: usize },

    #[error("Cannot parse real value from {token:?}")]
    Parse { token: String },

    #[error("Invalid format {spec:?}: {reason}")]
    InvalidFormat { spec: String, reason: &'static str },
}
