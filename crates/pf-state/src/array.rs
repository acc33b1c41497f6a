//! Multi-dimensional collections of primitive states.

use crate::error::{StateError, StateResult};
use crate::state::{FieldUpdate, PrimitiveState};
use rayon::prelude::*;
use std::ops::{Index, IndexMut};
use tracing::debug;

/// `D`-dimensional array of states in column-major order: the first index
/// varies fastest, which is also the order elements are persisted in.
///
/// Elements may carry different species counts.
#[derive(Clone, Debug, PartialEq)]
pub struct StateArray<const D: usize> {
    shape: [usize; D],
    data: Vec<PrimitiveState>,
}

pub type StateArray1 = StateArray<1>;
pub type StateArray2 = StateArray<2>;
pub type StateArray3 = StateArray<3>;
pub type StateArray4 = StateArray<4>;

impl<const D: usize> StateArray<D> {
    /// Array of uninitialized states.
    pub fn new(shape: [usize; D]) -> Self {
        Self::from_elem(shape, &PrimitiveState::new())
    }

    pub fn from_elem(shape: [usize; D], elem: &PrimitiveState) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![elem.clone(); len],
        }
    }

    /// Wrap elements already in column-major order.
    pub fn from_vec(shape: [usize; D], data: Vec<PrimitiveState>) -> StateResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(StateError::InvalidShape {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> [usize; D] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Storage offset of a multi-index, `None` when out of bounds.
    pub fn linear_index(&self, idx: [usize; D]) -> Option<usize> {
        let mut offset = 0;
        let mut stride = 1;
        for (i, n) in idx.iter().zip(self.shape) {
            if *i >= n {
                return None;
            }
            offset += i * stride;
            stride *= n;
        }
        Some(offset)
    }

    pub fn get(&self, idx: [usize; D]) -> Option<&PrimitiveState> {
        self.linear_index(idx).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, idx: [usize; D]) -> Option<&mut PrimitiveState> {
        self.linear_index(idx).map(move |i| &mut self.data[i])
    }

    pub fn as_slice(&self) -> &[PrimitiveState] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [PrimitiveState] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrimitiveState> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PrimitiveState> {
        self.data.iter_mut()
    }

    pub fn into_vec(self) -> Vec<PrimitiveState> {
        self.data
    }

    /// [`PrimitiveState::init`] with the same arguments on every element.
    pub fn init(&mut self, species_count: usize, update: &FieldUpdate<'_>) -> StateResult<()> {
        debug!(
            elements = self.data.len(),
            species_count, "initializing state array"
        );
        self.data
            .par_iter_mut()
            .try_for_each(|s| s.init(species_count, update))
    }

    /// [`PrimitiveState::set`] with the same arguments on every element.
    pub fn set(&mut self, update: &FieldUpdate<'_>) -> StateResult<()> {
        self.data.par_iter_mut().try_for_each(|s| s.set(update))
    }

    /// Release every element's species buffer.
    pub fn free(&mut self) -> StateResult<()> {
        debug!(elements = self.data.len(), "freeing state array");
        self.data.par_iter_mut().try_for_each(PrimitiveState::free)
    }
}

impl<const D: usize> Index<[usize; D]> for StateArray<D> {
    type Output = PrimitiveState;

    fn index(&self, idx: [usize; D]) -> &PrimitiveState {
        match self.linear_index(idx) {
            Some(i) => &self.data[i],
            None => panic!("index {idx:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<const D: usize> IndexMut<[usize; D]> for StateArray<D> {
    fn index_mut(&mut self, idx: [usize; D]) -> &mut PrimitiveState {
        match self.linear_index(idx) {
            Some(i) => &mut self.data[i],
            None => panic!("index {idx:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<'a, const D: usize> IntoIterator for &'a StateArray<D> {
    type Item = &'a PrimitiveState;
    type IntoIter = std::slice::Iter<'a, PrimitiveState>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Vector3;

    #[test]
    fn column_major_layout() {
        let a = StateArray2::new([2, 3]);
        assert_eq!(a.linear_index([0, 0]), Some(0));
        assert_eq!(a.linear_index([1, 0]), Some(1));
        assert_eq!(a.linear_index([0, 1]), Some(2));
        assert_eq!(a.linear_index([1, 2]), Some(5));
        assert_eq!(a.linear_index([2, 0]), None);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn init_broadcasts_to_every_element() {
        let mut a = StateArray3::new([2, 2, 2]);
        let update = FieldUpdate::new()
            .species(&[1.0, 2.0])
            .velocity(Vector3::new(1.0, 0.0, 0.0))
            .gamma(1.4);
        a.init(2, &update).unwrap();
        for s in &a {
            assert_eq!(s.species(), Some(&[1.0, 2.0][..]));
            assert_eq!(s.gamma, 1.4);
        }
    }

    #[test]
    fn init_failure_is_reported() {
        let mut a = StateArray1::new([3]);
        let err = a.init(1, &FieldUpdate::new().species(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, StateError::ShapeMismatch { .. }));
    }

    #[test]
    fn set_leaves_species_alone_when_absent() {
        let mut a = StateArray1::new([4]);
        a.init(3, &FieldUpdate::new()).unwrap();
        a.set(&FieldUpdate::new().pressure(2.0)).unwrap();
        assert!(a.iter().all(|s| s.species_count() == Some(3) && s.pressure == 2.0));
    }

    #[test]
    fn set_resizes_species_on_every_element() {
        let mut a = StateArray2::new([2, 2]);
        a[[0, 0]].init(1, &FieldUpdate::new()).unwrap();
        a[[1, 0]].init(4, &FieldUpdate::new()).unwrap();
        a[[0, 1]].init(3, &FieldUpdate::new()).unwrap();

        a.set(&FieldUpdate::new().species(&[0.5, 1.5, 2.5]).gamma(1.3))
            .unwrap();
        for s in &a {
            assert_eq!(s.species(), Some(&[0.5, 1.5, 2.5][..]));
            assert_eq!(s.gamma, 1.3);
        }
    }

    #[test]
    fn free_covers_four_dimensions() {
        let mut a = StateArray4::new([2, 1, 2, 1]);
        a.init(5, &FieldUpdate::new()).unwrap();
        assert!(a.free().is_ok());
        assert!(a.iter().all(|s| !s.is_allocated()));
        assert!(a.free().is_ok());
    }

    #[test]
    fn indexing_by_multi_index() {
        let mut a = StateArray2::new([2, 2]);
        a[[1, 1]].pressure = 7.0;
        assert_eq!(a.as_slice()[3].pressure, 7.0);
        assert!(a.get([2, 0]).is_none());
    }

    #[test]
    fn from_vec_checks_length() {
        let err = StateArray2::from_vec([2, 2], vec![PrimitiveState::new(); 3]).unwrap_err();
        assert!(matches!(err, StateError::InvalidShape { expected: 4, got: 3 }));
    }
}
