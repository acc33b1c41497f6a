//! Three-component real vector used for velocities.

use crate::numeric::{Real, Scalar};
use crate::stream::{BinaryReader, BinaryWriter, StreamResult, TextFormat, TextReader, TextWriter};
use nalgebra as na;
use std::io::{BufRead, Read, Write};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Cartesian vector `(x, y, z)`.
///
/// All binary operators are componentwise, including `*` and `/` between
/// two vectors. A scalar operand is broadcast to every component with its
/// position in the expression preserved.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3(na::Vector3<Real>);

impl Default for Vector3 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Vector3 {
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        Self(na::Vector3::new(x, y, z))
    }

    pub fn zeros() -> Self {
        Self(na::Vector3::zeros())
    }

    pub fn x(&self) -> Real {
        self.0.x
    }

    pub fn y(&self) -> Real {
        self.0.y
    }

    pub fn z(&self) -> Real {
        self.0.z
    }

    pub fn to_array(&self) -> [Real; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    pub fn from_array(c: [Real; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Euclidean length.
    pub fn norm(&self) -> Real {
        self.0.norm()
    }

    /// Broadcast a scalar into every component.
    pub fn assign_scalar<S: Scalar>(&mut self, k: S) {
        self.0.fill(k.to_real());
    }

    fn map(self, f: impl FnMut(Real) -> Real) -> Self {
        Self(self.0.map(f))
    }

    pub fn write_binary<W: Write>(&self, unit: &mut BinaryWriter<W>) -> StreamResult<()> {
        Self::write_binary_slice(std::slice::from_ref(self), unit)
    }

    pub fn read_binary<R: Read>(&mut self, unit: &mut BinaryReader<R>) -> StreamResult<()> {
        Self::read_binary_slice(std::slice::from_mut(self), unit)
    }

    pub fn write_formatted<W: Write>(
        &self,
        unit: &mut TextWriter<W>,
        format: &TextFormat,
    ) -> StreamResult<()> {
        Self::write_formatted_slice(std::slice::from_ref(self), unit, format)
    }

    pub fn read_formatted<R: BufRead>(
        &mut self,
        unit: &mut TextReader<R>,
        format: &TextFormat,
    ) -> StreamResult<()> {
        Self::read_formatted_slice(std::slice::from_mut(self), unit, format)
    }

    /// Write all vectors as one statement, components interleaved
    /// `x1 y1 z1 x2 y2 z2 ...`.
    pub fn write_binary_slice<W: Write>(
        vectors: &[Vector3],
        unit: &mut BinaryWriter<W>,
    ) -> StreamResult<()> {
        unit.write_reals(&flatten(vectors))
    }

    /// Read one statement of `3 * vectors.len()` values.
    ///
    /// Vectors are only updated when the whole statement was read.
    pub fn read_binary_slice<R: Read>(
        vectors: &mut [Vector3],
        unit: &mut BinaryReader<R>,
    ) -> StreamResult<()> {
        let raw = unit.read_vec(3 * vectors.len())?;
        scatter(vectors, &raw);
        Ok(())
    }

    pub fn write_formatted_slice<W: Write>(
        vectors: &[Vector3],
        unit: &mut TextWriter<W>,
        format: &TextFormat,
    ) -> StreamResult<()> {
        unit.write_reals(format, &flatten(vectors))
    }

    pub fn read_formatted_slice<R: BufRead>(
        vectors: &mut [Vector3],
        unit: &mut TextReader<R>,
        format: &TextFormat,
    ) -> StreamResult<()> {
        // seed with current values so list-directed `/` leaves them intact
        let mut raw = flatten(vectors);
        unit.read_reals(format, &mut raw)?;
        scatter(vectors, &raw);
        Ok(())
    }
}

fn flatten(vectors: &[Vector3]) -> Vec<Real> {
    vectors.iter().flat_map(|v| v.to_array()).collect()
}

fn scatter(vectors: &mut [Vector3], raw: &[Real]) {
    for (v, c) in vectors.iter_mut().zip(raw.chunks_exact(3)) {
        *v = Vector3::new(c[0], c[1], c[2]);
    }
}

impl From<[Real; 3]> for Vector3 {
    fn from(c: [Real; 3]) -> Self {
        Self::from_array(c)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 + rhs.0)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 - rhs.0)
    }
}

impl Mul for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0.component_mul(&rhs.0))
    }
}

impl Div for Vector3 {
    type Output = Vector3;
    fn div(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0.component_div(&rhs.0))
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3(-self.0)
    }
}

impl<S: Scalar> Add<S> for Vector3 {
    type Output = Vector3;
    fn add(self, k: S) -> Vector3 {
        let k = k.to_real();
        self.map(|c| c + k)
    }
}

impl<S: Scalar> Sub<S> for Vector3 {
    type Output = Vector3;
    fn sub(self, k: S) -> Vector3 {
        let k = k.to_real();
        self.map(|c| c - k)
    }
}

impl<S: Scalar> Mul<S> for Vector3 {
    type Output = Vector3;
    fn mul(self, k: S) -> Vector3 {
        let k = k.to_real();
        self.map(|c| c * k)
    }
}

impl<S: Scalar> Div<S> for Vector3 {
    type Output = Vector3;
    fn div(self, k: S) -> Vector3 {
        let k = k.to_real();
        self.map(|c| c / k)
    }
}

macro_rules! scalar_lhs_ops {
    ($t:ty) => {
        impl Add<Vector3> for $t {
            type Output = Vector3;
            fn add(self, v: Vector3) -> Vector3 {
                let k = Scalar::to_real(self);
                v.map(|c| k + c)
            }
        }

        impl Sub<Vector3> for $t {
            type Output = Vector3;
            fn sub(self, v: Vector3) -> Vector3 {
                let k = Scalar::to_real(self);
                v.map(|c| k - c)
            }
        }

        impl Mul<Vector3> for $t {
            type Output = Vector3;
            fn mul(self, v: Vector3) -> Vector3 {
                let k = Scalar::to_real(self);
                v.map(|c| k * c)
            }
        }

        impl Div<Vector3> for $t {
            type Output = Vector3;
            fn div(self, v: Vector3) -> Vector3 {
                let k = Scalar::to_real(self);
                v.map(|c| k / c)
            }
        }
    };
}

crate::for_each_scalar!(scalar_lhs_ops);
