//! Property tests for the state algebra and flat codec.

use pf_core::Vector3;
use pf_state::{FieldUpdate, Op, PrimitiveState};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    -1.0e6_f64..1.0e6_f64
}

fn state_with(ns: usize) -> impl Strategy<Value = PrimitiveState> {
    (
        prop::collection::vec(finite(), ns),
        prop::array::uniform3(finite()),
        finite(),
        finite(),
        finite(),
    )
        .prop_map(|(species, v, p, d, g)| {
            PrimitiveState::from_fields(
                &FieldUpdate::new()
                    .species(&species)
                    .velocity(Vector3::from(v))
                    .pressure(p)
                    .bulk_density(d)
                    .gamma(g),
            )
            .unwrap()
        })
}

fn state_pair() -> impl Strategy<Value = (PrimitiveState, PrimitiveState)> {
    (0usize..6).prop_flat_map(|ns| (state_with(ns), state_with(ns)))
}

fn check_componentwise(a: &PrimitiveState, b: &PrimitiveState, op: Op, c: &PrimitiveState) -> bool {
    let species = a
        .species()
        .unwrap()
        .iter()
        .zip(b.species().unwrap())
        .map(|(x, y)| op.apply(*x, *y));
    let velocity = a
        .velocity
        .to_array()
        .into_iter()
        .zip(b.velocity.to_array())
        .map(|(x, y)| op.apply(x, y));

    species.eq(c.species().unwrap().iter().copied())
        && velocity.eq(c.velocity.to_array())
        && c.pressure.to_bits() == op.apply(a.pressure, b.pressure).to_bits()
        && c.bulk_density.to_bits() == op.apply(a.bulk_density, b.bulk_density).to_bits()
        && c.gamma.to_bits() == op.apply(a.gamma, b.gamma).to_bits()
}

proptest! {
    #[test]
    fn addition_is_componentwise((a, b) in state_pair()) {
        prop_assert!(check_componentwise(&a, &b, Op::Add, &(&a + &b)));
    }

    #[test]
    fn subtraction_is_componentwise((a, b) in state_pair()) {
        prop_assert!(check_componentwise(&a, &b, Op::Sub, &(&a - &b)));
    }

    #[test]
    fn multiplication_is_componentwise((a, b) in state_pair()) {
        prop_assert!(check_componentwise(&a, &b, Op::Mul, &(&a * &b)));
    }

    #[test]
    fn division_is_componentwise((a, b) in state_pair()) {
        // NaN never compares equal, keep divisors away from zero
        let b = &b + 2.0e6;
        prop_assert!(check_componentwise(&a, &b, Op::Div, &(&a / &b)));
    }

    #[test]
    fn scalar_subtraction_keeps_operand_order(s in state_with(3), k in finite()) {
        let left = k - &s;
        let right = &s - k;
        prop_assert_eq!(left.pressure, k - s.pressure);
        prop_assert_eq!(right.pressure, s.pressure - k);
        prop_assert_eq!(left.species().unwrap()[2], k - s.species().unwrap()[2]);
        prop_assert_eq!(left.velocity.y(), k - s.velocity.y());
    }

    #[test]
    fn integer_scalars_coerce_to_real(s in state_with(2), k in -1000_i32..1000) {
        prop_assert_eq!(&s * k, &s * f64::from(k));
        prop_assert_eq!(k / &s, f64::from(k) / &s);
    }

    #[test]
    fn flat_round_trip(s in prop_oneof![state_with(0), state_with(1), state_with(5)]) {
        let flat = s.encode().unwrap();
        prop_assert_eq!(flat.len(), s.species_count().unwrap() + 6);
        prop_assert_eq!(PrimitiveState::decode(&flat).unwrap(), s);
    }
}
