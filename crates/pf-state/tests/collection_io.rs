//! Persistence of state collections through binary and text streams.

use pf_core::{BinaryReader, BinaryWriter, TextFormat, TextReader, TextWriter, Vector3};
use pf_state::{
    FieldUpdate, PrimitiveState, StateArray, StateArray1, StateArray2, StateArray3, StateError,
    StateIo,
};
use std::io::Cursor;

fn element(seed: f64, ns: usize) -> PrimitiveState {
    let species: Vec<f64> = (0..ns).map(|i| seed + i as f64 / 10.0).collect();
    PrimitiveState::from_fields(
        &FieldUpdate::new()
            .species(&species)
            .velocity(Vector3::new(seed, -seed, seed / 3.0))
            .pressure(1.0e5 + seed)
            .bulk_density(1.0 / (seed + 1.0))
            .gamma(1.4),
    )
    .unwrap()
}

fn populated_2d() -> StateArray2 {
    let data = (0..6).map(|i| element(i as f64, 2)).collect();
    StateArray2::from_vec([3, 2], data).unwrap()
}

/// Same shape and species counts, every value zero.
fn blank_like<const D: usize>(src: &StateArray<D>) -> StateArray<D> {
    let data = src
        .iter()
        .map(|s| {
            PrimitiveState::with_species_count(s.species_count().unwrap(), &FieldUpdate::new())
                .unwrap()
        })
        .collect();
    StateArray::from_vec(src.shape(), data).unwrap()
}

#[test]
fn binary_round_trip_2d() {
    let grid = populated_2d();
    let mut w = BinaryWriter::new(Vec::new());
    grid.write_binary(&mut w).unwrap();

    let mut back = blank_like(&grid);
    let mut r = BinaryReader::new(Cursor::new(w.into_inner()));
    back.read_binary(&mut r).unwrap();
    assert_eq!(back, grid);
}

#[test]
fn binary_layout_is_field_major() {
    let grid = StateArray1::from_vec([2], vec![element(1.0, 1), element(2.0, 1)]).unwrap();
    let mut w = BinaryWriter::new(Vec::new());
    grid.write_binary(&mut w).unwrap();

    let bytes = w.into_inner();
    let reals: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect();

    // species of both elements, then both velocities, then scalar fields
    assert_eq!(reals.len(), 2 + 6 + 2 + 2 + 2);
    assert_eq!(&reals[..2], &[1.0, 2.0]);
    assert_eq!(&reals[2..5], &[1.0, -1.0, 1.0 / 3.0]);
    assert_eq!(&reals[5..8], &[2.0, -2.0, 2.0 / 3.0]);
    assert_eq!(&reals[8..10], &[1.0e5 + 1.0, 1.0e5 + 2.0]);
    assert_eq!(&reals[12..], &[1.4, 1.4]);
}

#[test]
fn list_directed_round_trip_3d() {
    let data = (0..8).map(|i| element(i as f64 * 0.7, 3)).collect();
    let cube = StateArray3::from_vec([2, 2, 2], data).unwrap();

    let mut w = TextWriter::new(Vec::new());
    cube.write_formatted(&mut w, &TextFormat::ListDirected).unwrap();
    let text = w.into_inner();
    assert_eq!(String::from_utf8(text.clone()).unwrap().lines().count(), 5);

    let mut back = blank_like(&cube);
    let mut r = TextReader::new(Cursor::new(text));
    back.read_formatted(&mut r, &TextFormat::ListDirected).unwrap();
    assert_eq!(back, cube);
}

#[test]
fn edit_format_applies_to_every_statement() {
    let grid = StateArray1::from_vec([2], vec![element(1.0, 2), element(2.0, 2)]).unwrap();
    let format: TextFormat = "(3ES24.16E3)".parse().unwrap();

    let mut w = TextWriter::new(Vec::new());
    grid.write_formatted(&mut w, &format).unwrap();
    let text = String::from_utf8(w.into_inner()).unwrap();

    // 4 species, 6 velocity components, 2 values per scalar field
    // at three fields per record
    assert_eq!(text.lines().count(), 2 + 2 + 1 + 1 + 1);
    assert!(text.lines().all(|l| l.len() % 24 == 0));

    let mut back = blank_like(&grid);
    let mut r = TextReader::new(Cursor::new(text));
    back.read_formatted(&mut r, &format).unwrap();
    assert_eq!(back, grid);
}

#[test]
fn unallocated_element_fails_before_writing() {
    let mut grid = populated_2d();
    grid[[1, 1]].free().unwrap();

    let mut w = BinaryWriter::new(Vec::new());
    let err = grid.write_binary(&mut w).unwrap_err();
    assert!(matches!(err, StateError::Unallocated { .. }));
    assert!(w.get_ref().is_empty());
}

#[test]
fn slash_keeps_remaining_values() {
    let mut grid = StateArray1::from_elem([2], &element(4.0, 1));
    let text = " 9 /\n 4*0 2*\n /\n 1 2\n 3*7.5\n";
    let mut r = TextReader::new(Cursor::new(text));
    // last statement reads three values but only two are needed
    grid.read_formatted(&mut r, &TextFormat::ListDirected).unwrap();

    assert_eq!(grid[[0]].species(), Some(&[9.0][..]));
    assert_eq!(grid[[1]].species(), Some(&[4.0][..]));
    assert_eq!(grid[[0]].velocity, Vector3::zeros());
    assert_eq!(grid[[1]].velocity, Vector3::new(0.0, -4.0, 4.0 / 3.0));
    assert_eq!(grid[[0]].pressure, 1.0e5 + 4.0);
    assert_eq!(grid[[1]].bulk_density, 2.0);
    assert_eq!(grid[[1]].gamma, 7.5);
}
