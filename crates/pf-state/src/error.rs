//! Primitive-state errors.

use pf_core::{PfError, StreamError};
use thiserror::Error;

/// Result type for primitive-state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors raised by state lifecycle, algebra, codec and persistence.
#[derive(Error, Debug)]
pub enum StateError {
    /// Componentwise operation between states of different species counts.
    #[error("Species length mismatch: {lhs} vs {rhs}")]
    ShapeMismatch { lhs: usize, rhs: usize },

    /// Species-touching operation on a state with no species buffer.
    #[error("Species buffer not allocated: {what}")]
    Unallocated { what: &'static str },

    /// Flat array cannot hold the six non-species fields.
    #[error("Flat array too short: length {len}, need at least 6")]
    FlatTooShort { len: usize },

    /// Species buffer allocation failed.
    #[error("Cannot allocate {requested} species entries")]
    Alloc { requested: usize },

    /// Element count does not match a collection shape.
    #[error("Collection shape holds {expected} elements, got {got}")]
    InvalidShape { expected: usize, got: usize },

    /// A write/read statement failed.
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
}

impl From<StateError> for PfError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::ShapeMismatch { lhs, rhs } => PfError::Length {
                what: "species",
                expected: lhs,
                got: rhs,
            },
            StateError::Unallocated { what } => PfError::InvalidArg { what },
            StateError::FlatTooShort { .. } => PfError::InvalidArg {
                what: "flat array shorter than 6",
            },
            StateError::Alloc { .. } => PfError::Invariant {
                what: "species allocation failed",
            },
            StateError::InvalidShape { expected, got } => PfError::Length {
                what: "collection elements",
                expected,
                got,
            },
            StateError::Stream(e) => PfError::Stream(e),
        }
    }
}
