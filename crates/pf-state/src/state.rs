//! Primitive state record and its lifecycle.

use crate::error::{StateError, StateResult};
use pf_core::numeric::{Real, Scalar, Tolerances, nearly_equal};
use pf_core::units::{Density, Pressure, Ratio, Velocity, kg_per_m3, mps, pa, unitless};
use pf_core::{StreamError, Vector3};
use std::io::Write;
use tracing::trace;

/// Per-cell primitive description of a multi-species fluid.
///
/// The species buffer is either unallocated or holds exactly `Ns` partial
/// densities; an allocated empty buffer (`Ns = 0`) is distinct from an
/// unallocated one. `bulk_density` is stored on its own and is never derived
/// from the species densities.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveState {
    pub(crate) species: Option<Vec<Real>>,
    pub velocity: Vector3,
    pub pressure: Real,
    pub bulk_density: Real,
    /// Specific-heat ratio.
    pub gamma: Real,
}

/// Optional field values for [`PrimitiveState::init`] and
/// [`PrimitiveState::set`]. Only supplied fields are written.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldUpdate<'a> {
    pub species: Option<&'a [Real]>,
    pub velocity: Option<Vector3>,
    pub pressure: Option<Real>,
    pub bulk_density: Option<Real>,
    pub gamma: Option<Real>,
}

impl<'a> FieldUpdate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(mut self, species: &'a [Real]) -> Self {
        self.species = Some(species);
        self
    }

    pub fn velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn pressure(mut self, pressure: Real) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn bulk_density(mut self, bulk_density: Real) -> Self {
        self.bulk_density = Some(bulk_density);
        self
    }

    pub fn gamma(mut self, gamma: Real) -> Self {
        self.gamma = Some(gamma);
        self
    }
}

/// Zero-filled buffer of `n` reals, reporting allocation failure.
pub(crate) fn zeroed(n: usize) -> StateResult<Vec<Real>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(n)
        .map_err(|_| StateError::Alloc { requested: n })?;
    buf.resize(n, 0.0);
    Ok(buf)
}

impl PrimitiveState {
    /// An uninitialized state: no species buffer, all scalars zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with `species_count` zeroed species and the given fields.
    pub fn with_species_count(species_count: usize, update: &FieldUpdate<'_>) -> StateResult<Self> {
        let mut state = Self::new();
        state.init(species_count, update)?;
        Ok(state)
    }

    /// A state built from supplied fields, sizing species from the slice.
    pub fn from_fields(update: &FieldUpdate<'_>) -> StateResult<Self> {
        let mut state = Self::new();
        state.set(update)?;
        Ok(state)
    }

    /// Reallocate species to exactly `species_count` zeros, then write the
    /// supplied fields.
    ///
    /// A supplied species slice must hold `species_count` values; otherwise
    /// the state is left untouched.
    pub fn init(&mut self, species_count: usize, update: &FieldUpdate<'_>) -> StateResult<()> {
        if let Some(species) = update.species
            && species.len() != species_count
        {
            return Err(StateError::ShapeMismatch {
                lhs: species_count,
                rhs: species.len(),
            });
        }
        let mut buf = zeroed(species_count)?;
        if let Some(species) = update.species {
            buf.copy_from_slice(species);
        }
        self.species = Some(buf);
        self.apply_scalars(update);
        trace!(species_count, "initialized primitive state");
        Ok(())
    }

    /// Write the supplied fields, sizing species from the supplied slice.
    ///
    /// Species are left untouched when not supplied.
    pub fn set(&mut self, update: &FieldUpdate<'_>) -> StateResult<()> {
        if let Some(species) = update.species {
            let mut buf = zeroed(species.len())?;
            buf.copy_from_slice(species);
            self.species = Some(buf);
        }
        self.apply_scalars(update);
        Ok(())
    }

    fn apply_scalars(&mut self, update: &FieldUpdate<'_>) {
        if let Some(v) = update.velocity {
            self.velocity = v;
        }
        if let Some(p) = update.pressure {
            self.pressure = p;
        }
        if let Some(d) = update.bulk_density {
            self.bulk_density = d;
        }
        if let Some(g) = update.gamma {
            self.gamma = g;
        }
    }

    /// Release the species buffer.
    ///
    /// Always succeeds; freeing an unallocated state is a no-op.
    pub fn free(&mut self) -> StateResult<()> {
        if self.species.take().is_some() {
            trace!("released species buffer");
        }
        Ok(())
    }

    pub fn is_allocated(&self) -> bool {
        self.species.is_some()
    }

    /// `Ns`, or `None` while unallocated.
    pub fn species_count(&self) -> Option<usize> {
        self.species.as_ref().map(Vec::len)
    }

    pub fn species(&self) -> Option<&[Real]> {
        self.species.as_deref()
    }

    /// Mutable view of the species densities; cannot change `Ns`.
    pub fn species_mut(&mut self) -> Option<&mut [Real]> {
        self.species.as_deref_mut()
    }

    /// Make the species buffer exactly `n` long, reusing it when it already is.
    pub(crate) fn ensure_species(&mut self, n: usize) -> StateResult<&mut [Real]> {
        if self.species.as_ref().is_none_or(|buf| buf.len() != n) {
            self.species = Some(zeroed(n)?);
        }
        self.species_mut().ok_or(StateError::Unallocated {
            what: "result species",
        })
    }

    /// Value assignment.
    ///
    /// Velocity, pressure, bulk density and gamma are always copied. Species
    /// are copied only when both sides are allocated, see
    /// [`copy_species_if_both_allocated`](Self::copy_species_if_both_allocated).
    pub fn assign(&mut self, src: &PrimitiveState) {
        self.copy_species_if_both_allocated(src);
        self.velocity = src.velocity;
        self.pressure = src.pressure;
        self.bulk_density = src.bulk_density;
        self.gamma = src.gamma;
    }

    /// Copy `src`'s species into `self` when both buffers are allocated,
    /// taking `src`'s length. Never allocates an absent buffer.
    ///
    /// Returns whether species were copied.
    pub fn copy_species_if_both_allocated(&mut self, src: &PrimitiveState) -> bool {
        match (self.species.as_mut(), src.species.as_deref()) {
            (Some(dst), Some(species)) => {
                dst.clear();
                dst.extend_from_slice(species);
                true
            }
            _ => false,
        }
    }

    /// Broadcast a scalar into every field.
    ///
    /// Species receive the value only when already allocated.
    pub fn assign_scalar<S: Scalar>(&mut self, k: S) {
        let k = k.to_real();
        if let Some(species) = self.species.as_mut() {
            species.fill(k);
        }
        self.velocity.assign_scalar(k);
        self.pressure = k;
        self.bulk_density = k;
        self.gamma = k;
    }

    pub fn pressure_si(&self) -> Pressure {
        pa(self.pressure)
    }

    pub fn bulk_density_si(&self) -> Density {
        kg_per_m3(self.bulk_density)
    }

    /// Magnitude of the velocity.
    pub fn speed_si(&self) -> Velocity {
        mps(self.velocity.norm())
    }

    pub fn gamma_ratio(&self) -> Ratio {
        unitless(self.gamma)
    }

    /// Field-by-field comparison within `tol`.
    ///
    /// Species allocation state and length must match exactly.
    pub fn nearly_equal(&self, other: &PrimitiveState, tol: Tolerances) -> bool {
        let species_close = match (self.species(), other.species()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| nearly_equal(*x, *y, tol))
            }
            _ => false,
        };
        species_close
            && self
                .velocity
                .to_array()
                .iter()
                .zip(other.velocity.to_array())
                .all(|(x, y)| nearly_equal(*x, y, tol))
            && nearly_equal(self.pressure, other.pressure, tol)
            && nearly_equal(self.bulk_density, other.bulk_density, tol)
            && nearly_equal(self.gamma, other.gamma, tol)
    }

    /// Human-readable dump, one field per line, each line led by `prefix`.
    pub fn print_report<W: Write>(&self, prefix: &str, out: &mut W) -> StateResult<()> {
        let mut emit = |line: String| writeln!(out, "{prefix}{line}").map_err(StreamError::from);
        if let Some(species) = self.species() {
            for (i, r) in species.iter().enumerate() {
                emit(format!("r({}) = {r:.16E}", i + 1))?;
            }
        }
        let [x, y, z] = self.velocity.to_array();
        emit(format!("u = {x:.16E} {y:.16E} {z:.16E}"))?;
        emit(format!("p = {:.16E}", self.pressure))?;
        emit(format!("d = {:.16E}", self.bulk_density))?;
        emit(format!("g = {:.16E}", self.gamma))?;
        Ok(())
    }
}
