//! pf-state: multi-species fluid primitive states for primflow.
//!
//! Provides:
//! - `PrimitiveState` (species densities, velocity, pressure, bulk density, gamma)
//!   and its allocation lifecycle
//! - Componentwise and scalar-broadcast arithmetic
//! - Flat-array encoding (`Ns + 6` reals)
//! - `StateArray<D>` collections in column-major order
//! - Binary and formatted persistence through `StateIo`
//!
//! # Example
//!
//! ```
//! use pf_core::Vector3;
//! use pf_state::{FieldUpdate, PrimitiveState};
//!
//! let s = PrimitiveState::from_fields(
//!     &FieldUpdate::new()
//!         .species(&[1.0, 2.0])
//!         .velocity(Vector3::zeros())
//!         .pressure(101325.0)
//!         .bulk_density(3.0)
//!         .gamma(1.4),
//! )
//! .unwrap();
//!
//! let doubled: PrimitiveState = 2.0 * &s;
//! assert_eq!(doubled.species(), Some(&[2.0, 4.0][..]));
//! assert_eq!(s.encode().unwrap(), vec![1.0, 2.0, 0.0, 0.0, 0.0, 101325.0, 3.0, 1.4]);
//! ```

pub mod algebra;
pub mod array;
pub mod error;
pub mod flat;
pub mod io;
pub mod state;

pub use algebra::{Op, ScalarSide};
pub use array::{StateArray, StateArray1, StateArray2, StateArray3, StateArray4};
pub use error::{StateError, StateResult};
pub use flat::FLAT_EXTRA;
pub use io::StateIo;
pub use state::{FieldUpdate, PrimitiveState};
