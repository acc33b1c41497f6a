//! pf-core: stable foundation for primflow.
//!
//! Contains:
//! - numeric (working precision `Real`, scalar coercion, tolerances)
//! - units (uom SI types + constructors)
//! - vector (3-component velocity vector)
//! - stream (binary and formatted record streams)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod stream;
pub mod units;
pub mod vector;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use numeric::*;
pub use stream::{
    BinaryReader, BinaryWriter, StreamError, StreamResult, TextFormat, TextReader, TextWriter,
};
pub use units::*;
pub use vector::Vector3;
