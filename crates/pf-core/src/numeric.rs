/// Working precision used throughout the system.
pub type Real = f64;

/// A numeric operand that can be combined with states and vectors.
///
/// Every integer and float kind is coerced to [`Real`] before it touches a
/// field, so the algebra is defined on the coerced value only.
pub trait Scalar: Copy {
    fn to_real(self) -> Real;
}

macro_rules! impl_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn to_real(self) -> Real {
                    self as Real
                }
            }
        )*
    };
}

impl_scalar!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

/// Invoke `$mac!(T)` once for every [`Scalar`] kind.
///
/// Used by downstream crates to stamp out `scalar ⊕ value` operator impls,
/// which coherence rules do not allow to be written generically.
#[macro_export]
macro_rules! for_each_scalar {
    ($mac:ident) => {
        $mac!(f32);
        $mac!(f64);
        $mac!(i8);
        $mac!(i16);
        $mac!(i32);
        $mac!(i64);
        $mac!(i128);
        $mac!(isize);
        $mac!(u8);
        $mac!(u16);
        $mac!(u32);
        $mac!(u64);
        $mac!(u128);
        $mac!(usize);
    };
}

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}
