//! Binary and formatted persistence of states and state collections.
//!
//! A persisted collection is field-major: one statement with the species of
//! every element (storage order), one velocity statement for the whole
//! collection, then one statement each for pressure, bulk density and gamma.
//! Streams carry no lengths, so reads size species from each element's
//! current species count.
//!
//! The status of a write/read is the status of its *last* statement. An
//! earlier failing statement is logged at `warn` and otherwise only visible
//! through the state of the stream.

use crate::array::StateArray;
use crate::error::{StateError, StateResult};
use crate::state::PrimitiveState;
use pf_core::{
    BinaryReader, BinaryWriter, Real, StreamResult, TextFormat, TextReader, TextWriter, Vector3,
};
use std::io::{BufRead, Read, Write};
use tracing::{trace, warn};

/// Sequential persistence of one state or a collection of states.
pub trait StateIo {
    fn write_binary<W: Write>(&self, unit: &mut BinaryWriter<W>) -> StateResult<()>;

    fn read_binary<R: Read>(&mut self, unit: &mut BinaryReader<R>) -> StateResult<()>;

    /// `format` applies to every statement, the velocity one included.
    fn write_formatted<W: Write>(
        &self,
        unit: &mut TextWriter<W>,
        format: &TextFormat,
    ) -> StateResult<()>;

    fn read_formatted<R: BufRead>(
        &mut self,
        unit: &mut TextReader<R>,
        format: &TextFormat,
    ) -> StateResult<()>;
}

trait WriteUnit {
    fn reals(&mut self, values: &[Real]) -> StreamResult<()>;
    fn vectors(&mut self, values: &[Vector3]) -> StreamResult<()>;
}

trait ReadUnit {
    fn reals(&mut self, out: &mut [Real]) -> StreamResult<()>;
    fn vectors(&mut self, out: &mut [Vector3]) -> StreamResult<()>;
}

impl<W: Write> WriteUnit for BinaryWriter<W> {
    fn reals(&mut self, values: &[Real]) -> StreamResult<()> {
        self.write_reals(values)
    }

    fn vectors(&mut self, values: &[Vector3]) -> StreamResult<()> {
        Vector3::write_binary_slice(values, self)
    }
}

impl<R: Read> ReadUnit for BinaryReader<R> {
    fn reals(&mut self, out: &mut [Real]) -> StreamResult<()> {
        self.read_reals(out)
    }

    fn vectors(&mut self, out: &mut [Vector3]) -> StreamResult<()> {
        Vector3::read_binary_slice(out, self)
    }
}

struct Formatted<'a, U> {
    unit: &'a mut U,
    format: &'a TextFormat,
}

impl<W: Write> WriteUnit for Formatted<'_, TextWriter<W>> {
    fn reals(&mut self, values: &[Real]) -> StreamResult<()> {
        self.unit.write_reals(self.format, values)
    }

    fn vectors(&mut self, values: &[Vector3]) -> StreamResult<()> {
        Vector3::write_formatted_slice(values, self.unit, self.format)
    }
}

impl<R: BufRead> ReadUnit for Formatted<'_, TextReader<R>> {
    fn reals(&mut self, out: &mut [Real]) -> StreamResult<()> {
        self.unit.read_reals(self.format, out)
    }

    fn vectors(&mut self, out: &mut [Vector3]) -> StreamResult<()> {
        Vector3::read_formatted_slice(out, self.unit, self.format)
    }
}

const STATEMENTS: [&str; 5] = ["species", "velocity", "pressure", "bulk_density", "gamma"];

/// Keep the last statement's status, logging earlier failures.
fn last_statement_status(statuses: [StreamResult<()>; 5]) -> StateResult<()> {
    let [earlier @ .., last] = statuses;
    for (field, result) in STATEMENTS.iter().zip(earlier) {
        if let Err(e) = result {
            warn!(field = %field, error = %e, "statement failed, status masked by later statement");
        }
    }
    last.map_err(StateError::from)
}

/// Concatenated species of every element, or `Unallocated`.
fn gather_species(states: &[PrimitiveState], what: &'static str) -> StateResult<Vec<Real>> {
    let mut all = Vec::new();
    for s in states {
        all.extend_from_slice(s.species().ok_or(StateError::Unallocated { what })?);
    }
    Ok(all)
}

fn scatter_species(states: &mut [PrimitiveState], raw: &[Real]) {
    let mut rest = raw;
    for s in states {
        if let Some(species) = s.species_mut() {
            let (head, tail) = rest.split_at(species.len());
            species.copy_from_slice(head);
            rest = tail;
        }
    }
}

fn field_values(states: &[PrimitiveState], field: fn(&PrimitiveState) -> Real) -> Vec<Real> {
    states.iter().map(field).collect()
}

fn write_states(states: &[PrimitiveState], unit: &mut impl WriteUnit) -> StateResult<()> {
    let species = gather_species(states, "write")?;
    trace!(elements = states.len(), reals = species.len(), "writing states");
    let velocities: Vec<Vector3> = states.iter().map(|s| s.velocity).collect();
    last_statement_status([
        unit.reals(&species),
        unit.vectors(&velocities),
        unit.reals(&field_values(states, |s| s.pressure)),
        unit.reals(&field_values(states, |s| s.bulk_density)),
        unit.reals(&field_values(states, |s| s.gamma)),
    ])
}

/// Read one scalar field statement; the field is only updated when the
/// whole statement succeeded.
fn read_field(
    states: &mut [PrimitiveState],
    unit: &mut impl ReadUnit,
    field: fn(&mut PrimitiveState) -> &mut Real,
) -> StreamResult<()> {
    let mut raw: Vec<Real> = states.iter_mut().map(|s| *field(s)).collect();
    unit.reals(&mut raw)?;
    for (s, v) in states.iter_mut().zip(raw) {
        *field(s) = v;
    }
    Ok(())
}

fn read_states(states: &mut [PrimitiveState], unit: &mut impl ReadUnit) -> StateResult<()> {
    // seeded with current values so a `/`-terminated statement keeps them
    let mut species = gather_species(states, "read")?;
    trace!(elements = states.len(), reals = species.len(), "reading states");

    let species_status = unit
        .reals(&mut species)
        .map(|()| scatter_species(states, &species));

    let mut velocities: Vec<Vector3> = states.iter().map(|s| s.velocity).collect();
    let velocity_status = unit.vectors(&mut velocities).map(|()| {
        for (s, v) in states.iter_mut().zip(velocities) {
            s.velocity = v;
        }
    });

    last_statement_status([
        species_status,
        velocity_status,
        read_field(states, unit, |s| &mut s.pressure),
        read_field(states, unit, |s| &mut s.bulk_density),
        read_field(states, unit, |s| &mut s.gamma),
    ])
}

impl StateIo for PrimitiveState {
    fn write_binary<W: Write>(&self, unit: &mut BinaryWriter<W>) -> StateResult<()> {
        write_states(std::slice::from_ref(self), unit)
    }

    fn read_binary<R: Read>(&mut self, unit: &mut BinaryReader<R>) -> StateResult<()> {
        read_states(std::slice::from_mut(self), unit)
    }

    fn write_formatted<W: Write>(
        &self,
        unit: &mut TextWriter<W>,
        format: &TextFormat,
    ) -> StateResult<()> {
        write_states(std::slice::from_ref(self), &mut Formatted { unit, format })
    }

    fn read_formatted<R: BufRead>(
        &mut self,
        unit: &mut TextReader<R>,
        format: &TextFormat,
    ) -> StateResult<()> {
        read_states(std::slice::from_mut(self), &mut Formatted { unit, format })
    }
}

macro_rules! state_array_io {
    ($($d:literal),*) => {$(
        impl StateIo for StateArray<$d> {
            fn write_binary<W: Write>(&self, unit: &mut BinaryWriter<W>) -> StateResult<()> {
                write_states(self.as_slice(), unit)
            }

            fn read_binary<R: Read>(&mut self, unit: &mut BinaryReader<R>) -> StateResult<()> {
                read_states(self.as_mut_slice(), unit)
            }

            fn write_formatted<W: Write>(
                &self,
                unit: &mut TextWriter<W>,
                format: &TextFormat,
            ) -> StateResult<()> {
                write_states(self.as_slice(), &mut Formatted { unit, format })
            }

            fn read_formatted<R: BufRead>(
                &mut self,
                unit: &mut TextReader<R>,
                format: &TextFormat,
            ) -> StateResult<()> {
                read_states(self.as_mut_slice(), &mut Formatted { unit, format })
            }
        }
    )*};
}

state_array_io!(1, 2, 3);
