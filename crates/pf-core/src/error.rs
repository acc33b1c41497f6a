use crate::stream::StreamError;
use thiserror::Error;

pub type PfResult<T> = Result<T, PfError>;

#[derive(Error, Debug)]
pub enum PfError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} (expected {expected}, got {got})")]
    Length {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_converts() {
        let err: PfError = StreamError::UnexpectedEof { expected: 3, got: 1 }.into();
        assert!(matches!(err, PfError::Stream(_)));
        assert!(err.to_string().contains("expected 3"));
    }
}
