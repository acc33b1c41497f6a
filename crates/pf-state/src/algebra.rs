//! Elementwise arithmetic on primitive states.
//!
//! Every binary operator acts componentwise on all five fields; a scalar is
//! coerced to [`Real`] and broadcast to every species entry and every
//! velocity component, keeping its side of the expression. The fallible
//! `try_*` methods report shape and allocation errors; the operator traits
//! panic with the same error.

use crate::error::{StateError, StateResult};
use crate::state::PrimitiveState;
use pf_core::numeric::{Real, Scalar};
use pf_core::Vector3;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Position of a scalar operand in `k ⊕ state` / `state ⊕ k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarSide {
    Left,
    Right,
}

impl Op {
    #[inline]
    pub fn apply(self, a: Real, b: Real) -> Real {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
        }
    }

    fn vectors(self, a: Vector3, b: Vector3) -> Vector3 {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
        }
    }

    #[inline]
    fn with_scalar(self, side: ScalarSide, k: Real, x: Real) -> Real {
        match side {
            ScalarSide::Left => self.apply(k, x),
            ScalarSide::Right => self.apply(x, k),
        }
    }

    fn vector_with_scalar(self, side: ScalarSide, k: Real, v: Vector3) -> Vector3 {
        match (side, self) {
            (ScalarSide::Left, Op::Add) => k + v,
            (ScalarSide::Left, Op::Sub) => k - v,
            (ScalarSide::Left, Op::Mul) => k * v,
            (ScalarSide::Left, Op::Div) => k / v,
            (ScalarSide::Right, Op::Add) => v + k,
            (ScalarSide::Right, Op::Sub) => v - k,
            (ScalarSide::Right, Op::Mul) => v * k,
            (ScalarSide::Right, Op::Div) => v / k,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        }
    }
}

fn species_pair<'a>(
    lhs: &'a PrimitiveState,
    rhs: &'a PrimitiveState,
) -> StateResult<(&'a [Real], &'a [Real])> {
    let a = lhs.species().ok_or(StateError::Unallocated {
        what: "left operand species",
    })?;
    let b = rhs.species().ok_or(StateError::Unallocated {
        what: "right operand species",
    })?;
    if a.len() != b.len() {
        return Err(StateError::ShapeMismatch {
            lhs: a.len(),
            rhs: b.len(),
        });
    }
    Ok((a, b))
}

fn operand_species(state: &PrimitiveState) -> StateResult<&[Real]> {
    state.species().ok_or(StateError::Unallocated {
        what: "operand species",
    })
}

impl PrimitiveState {
    /// `self ⊕ rhs` into `out`, sizing `out`'s species first.
    pub fn combine_into(
        &self,
        rhs: &PrimitiveState,
        op: Op,
        out: &mut PrimitiveState,
    ) -> StateResult<()> {
        let (a, b) = species_pair(self, rhs)?;
        let dst = out.ensure_species(a.len())?;
        for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
            *d = op.apply(*x, *y);
        }
        out.velocity = op.vectors(self.velocity, rhs.velocity);
        out.pressure = op.apply(self.pressure, rhs.pressure);
        out.bulk_density = op.apply(self.bulk_density, rhs.bulk_density);
        out.gamma = op.apply(self.gamma, rhs.gamma);
        Ok(())
    }

    /// `self = self ⊕ rhs`, reusing `self`'s species buffer.
    pub fn combine_assign(&mut self, rhs: &PrimitiveState, op: Op) -> StateResult<()> {
        species_pair(self, rhs)?;
        if let (Some(dst), Some(b)) = (self.species.as_deref_mut(), rhs.species()) {
            for (d, y) in dst.iter_mut().zip(b) {
                *d = op.apply(*d, *y);
            }
        }
        self.velocity = op.vectors(self.velocity, rhs.velocity);
        self.pressure = op.apply(self.pressure, rhs.pressure);
        self.bulk_density = op.apply(self.bulk_density, rhs.bulk_density);
        self.gamma = op.apply(self.gamma, rhs.gamma);
        Ok(())
    }

    /// Fresh `self ⊕ rhs`.
    pub fn try_combine(&self, rhs: &PrimitiveState, op: Op) -> StateResult<PrimitiveState> {
        let mut out = PrimitiveState::new();
        self.combine_into(rhs, op, &mut out)?;
        Ok(out)
    }

    pub fn try_add(&self, rhs: &PrimitiveState) -> StateResult<PrimitiveState> {
        self.try_combine(rhs, Op::Add)
    }

    pub fn try_sub(&self, rhs: &PrimitiveState) -> StateResult<PrimitiveState> {
        self.try_combine(rhs, Op::Sub)
    }

    pub fn try_mul(&self, rhs: &PrimitiveState) -> StateResult<PrimitiveState> {
        self.try_combine(rhs, Op::Mul)
    }

    pub fn try_div(&self, rhs: &PrimitiveState) -> StateResult<PrimitiveState> {
        self.try_combine(rhs, Op::Div)
    }

    /// `k ⊕ self` or `self ⊕ k` into `out`, with `k` coerced to [`Real`].
    pub fn broadcast_into<S: Scalar>(
        &self,
        k: S,
        op: Op,
        side: ScalarSide,
        out: &mut PrimitiveState,
    ) -> StateResult<()> {
        let k = k.to_real();
        let src = operand_species(self)?;
        let dst = out.ensure_species(src.len())?;
        for (d, x) in dst.iter_mut().zip(src) {
            *d = op.with_scalar(side, k, *x);
        }
        out.velocity = op.vector_with_scalar(side, k, self.velocity);
        out.pressure = op.with_scalar(side, k, self.pressure);
        out.bulk_density = op.with_scalar(side, k, self.bulk_density);
        out.gamma = op.with_scalar(side, k, self.gamma);
        Ok(())
    }

    /// In-place form of [`broadcast_into`](Self::broadcast_into).
    pub fn broadcast_assign<S: Scalar>(
        &mut self,
        k: S,
        op: Op,
        side: ScalarSide,
    ) -> StateResult<()> {
        let k = k.to_real();
        let species = self.species.as_deref_mut().ok_or(StateError::Unallocated {
            what: "operand species",
        })?;
        for x in species.iter_mut() {
            *x = op.with_scalar(side, k, *x);
        }
        self.velocity = op.vector_with_scalar(side, k, self.velocity);
        self.pressure = op.with_scalar(side, k, self.pressure);
        self.bulk_density = op.with_scalar(side, k, self.bulk_density);
        self.gamma = op.with_scalar(side, k, self.gamma);
        Ok(())
    }

    pub fn try_broadcast<S: Scalar>(
        &self,
        k: S,
        op: Op,
        side: ScalarSide,
    ) -> StateResult<PrimitiveState> {
        let mut out = PrimitiveState::new();
        self.broadcast_into(k, op, side, &mut out)?;
        Ok(out)
    }

    /// Unary plus: a copy in a freshly sized buffer.
    pub fn try_pos(&self) -> StateResult<PrimitiveState> {
        let src = operand_species(self)?;
        let mut out = PrimitiveState::new();
        out.ensure_species(src.len())?.copy_from_slice(src);
        out.velocity = self.velocity;
        out.pressure = self.pressure;
        out.bulk_density = self.bulk_density;
        out.gamma = self.gamma;
        Ok(out)
    }

    /// Unary minus: every field negated.
    pub fn try_neg(&self) -> StateResult<PrimitiveState> {
        let src = operand_species(self)?;
        let mut out = PrimitiveState::new();
        for (d, x) in out.ensure_species(src.len())?.iter_mut().zip(src) {
            *d = -*x;
        }
        out.velocity = -self.velocity;
        out.pressure = -self.pressure;
        out.bulk_density = -self.bulk_density;
        out.gamma = -self.gamma;
        Ok(out)
    }
}

fn raise<T>(op: &str, result: StateResult<T>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("primitive state `{op}`: {e}"),
    }
}

macro_rules! state_ops {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:expr) => {
        impl $trait<&PrimitiveState> for &PrimitiveState {
            type Output = PrimitiveState;
            fn $method(self, rhs: &PrimitiveState) -> PrimitiveState {
                raise($op.name(), self.try_combine(rhs, $op))
            }
        }

        impl $trait<&PrimitiveState> for PrimitiveState {
            type Output = PrimitiveState;
            fn $method(mut self, rhs: &PrimitiveState) -> PrimitiveState {
                raise($op.name(), self.combine_assign(rhs, $op));
                self
            }
        }

        impl $trait<PrimitiveState> for PrimitiveState {
            type Output = PrimitiveState;
            fn $method(self, rhs: PrimitiveState) -> PrimitiveState {
                $trait::$method(self, &rhs)
            }
        }

        impl $assign_trait<&PrimitiveState> for PrimitiveState {
            fn $assign_method(&mut self, rhs: &PrimitiveState) {
                raise($op.name(), self.combine_assign(rhs, $op));
            }
        }
    };
}

state_ops!(Add, add, AddAssign, add_assign, Op::Add);
state_ops!(Sub, sub, SubAssign, sub_assign, Op::Sub);
state_ops!(Mul, mul, MulAssign, mul_assign, Op::Mul);
state_ops!(Div, div, DivAssign, div_assign, Op::Div);

macro_rules! scalar_ops {
    (@op $t:ty, $trait:ident, $method:ident,
     $assign_trait:ident, $assign_method:ident, $op:expr) => {
        impl $trait<$t> for &PrimitiveState {
            type Output = PrimitiveState;
            fn $method(self, k: $t) -> PrimitiveState {
                raise($op.name(), self.try_broadcast(k, $op, ScalarSide::Right))
            }
        }

        impl $trait<$t> for PrimitiveState {
            type Output = PrimitiveState;
            fn $method(mut self, k: $t) -> PrimitiveState {
                raise($op.name(), self.broadcast_assign(k, $op, ScalarSide::Right));
                self
            }
        }

        impl $trait<&PrimitiveState> for $t {
            type Output = PrimitiveState;
            fn $method(self, s: &PrimitiveState) -> PrimitiveState {
                raise($op.name(), s.try_broadcast(self, $op, ScalarSide::Left))
            }
        }

        impl $trait<PrimitiveState> for $t {
            type Output = PrimitiveState;
            fn $method(self, mut s: PrimitiveState) -> PrimitiveState {
                raise($op.name(), s.broadcast_assign(self, $op, ScalarSide::Left));
                s
            }
        }

        impl $assign_trait<$t> for PrimitiveState {
            fn $assign_method(&mut self, k: $t) {
                raise($op.name(), self.broadcast_assign(k, $op, ScalarSide::Right));
            }
        }
    };
    ($t:ty) => {
        scalar_ops!(@op $t, Add, add, AddAssign, add_assign, Op::Add);
        scalar_ops!(@op $t, Sub, sub, SubAssign, sub_assign, Op::Sub);
        scalar_ops!(@op $t, Mul, mul, MulAssign, mul_assign, Op::Mul);
        scalar_ops!(@op $t, Div, div, DivAssign, div_assign, Op::Div);
    };
}

pf_core::for_each_scalar!(scalar_ops);

impl Neg for &PrimitiveState {
    type Output = PrimitiveState;
    fn neg(self) -> PrimitiveState {
        raise("-", self.try_neg())
    }
}

impl Neg for PrimitiveState {
    type Output = PrimitiveState;
    fn neg(self) -> PrimitiveState {
        raise("-", self.try_neg())
    }
}
