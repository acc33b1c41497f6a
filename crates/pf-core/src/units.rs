// pf-core/src/units.rs

use crate::numeric::Real;
use uom::si::f64::{
    MassDensity as UomMassDensity, Pressure as UomPressure, Ratio as UomRatio,
    Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Velocity = UomVelocity;

#[inline]
pub fn pa(v: Real) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kg_per_m3(v: Real) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps(v: Real) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn unitless(v: Real) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}
