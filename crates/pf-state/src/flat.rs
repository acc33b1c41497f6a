//! Flat-array codec.
//!
//! Layout: `[species(1..Ns), vx, vy, vz, pressure, bulk_density, gamma]`,
//! `Ns + 6` reals with no header.

use crate::error::{StateError, StateResult};
use crate::state::PrimitiveState;
use pf_core::{Real, Vector3};

/// Number of non-species entries in a flat array.
pub const FLAT_EXTRA: usize = 6;

impl PrimitiveState {
    /// Length of this state's flat encoding.
    pub fn flat_len(&self) -> Option<usize> {
        self.species_count().map(|ns| ns + FLAT_EXTRA)
    }

    pub fn encode(&self) -> StateResult<Vec<Real>> {
        let species = self.species().ok_or(StateError::Unallocated { what: "encode" })?;
        let mut out = Vec::with_capacity(species.len() + FLAT_EXTRA);
        out.extend_from_slice(species);
        out.extend_from_slice(&self.velocity.to_array());
        out.extend_from_slice(&[self.pressure, self.bulk_density, self.gamma]);
        Ok(out)
    }

    pub fn decode(array: &[Real]) -> StateResult<PrimitiveState> {
        let mut state = PrimitiveState::new();
        state.decode_into(array)?;
        Ok(state)
    }

    /// Overwrite every field from `array`, resizing species to `len - 6`.
    pub fn decode_into(&mut self, array: &[Real]) -> StateResult<()> {
        let ns = array
            .len()
            .checked_sub(FLAT_EXTRA)
            .ok_or(StateError::FlatTooShort { len: array.len() })?;
        let (species, tail) = array.split_at(ns);
        self.ensure_species(ns)?.copy_from_slice(species);
        self.velocity = Vector3::new(tail[0], tail[1], tail[2]);
        self.pressure = tail[3];
        self.bulk_density = tail[4];
        self.gamma = tail[5];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldUpdate;

    fn reference() -> PrimitiveState {
        PrimitiveState::from_fields(
            &FieldUpdate::new()
                .species(&[1.0, 2.0])
                .velocity(Vector3::zeros())
                .pressure(101_325.0)
                .bulk_density(3.0)
                .gamma(1.4),
        )
        .unwrap()
    }

    #[test]
    fn encode_layout() {
        let flat = reference().encode().unwrap();
        assert_eq!(flat, vec![1.0, 2.0, 0.0, 0.0, 0.0, 101_325.0, 3.0, 1.4]);
        assert_eq!(reference().flat_len(), Some(8));
    }

    #[test]
    fn decode_reproduces_state() {
        let flat = [1.0, 2.0, 0.0, 0.0, 0.0, 101_325.0, 3.0, 1.4];
        assert_eq!(PrimitiveState::decode(&flat).unwrap(), reference());
    }

    #[test]
    fn decode_of_six_values_has_no_species() {
        let s = PrimitiveState::decode(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(s.species_count(), Some(0));
        assert_eq!(s.velocity, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(s.gamma, 6.0);
    }

    #[test]
    fn short_arrays_are_rejected() {
        let err = PrimitiveState::decode(&[1.0; 5]).unwrap_err();
        assert!(matches!(err, StateError::FlatTooShort { len: 5 }));
    }

    #[test]
    fn decode_into_resizes() {
        let mut s = reference();
        s.decode_into(&[9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(s.species(), Some(&[9.0][..]));
    }

    #[test]
    fn encode_requires_allocation() {
        assert!(matches!(
            PrimitiveState::new().encode(),
            Err(StateError::Unallocated { .. })
        ));
    }

    #[test]
    fn encode_does_not_alias() {
        let s = reference();
        let mut flat = s.encode().unwrap();
        flat[0] = 42.0;
        assert_eq!(s.species().unwrap()[0], 1.0);
    }
}
