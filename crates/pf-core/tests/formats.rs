//! Text format round trips for pf-core.

use pf_core::stream::{EditFormat, parse_real};
use pf_core::{TextFormat, TextReader, TextWriter};
use proptest::prelude::*;
use std::io::Cursor;

fn finite() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO
}

fn edit(spec: &str) -> EditFormat {
    match spec.parse::<TextFormat>().unwrap() {
        TextFormat::Edit(e) => e,
        TextFormat::ListDirected => panic!("expected edit format"),
    }
}

proptest! {
    #[test]
    fn es_fields_round_trip(v in finite()) {
        let f = edit("(ES24.16E3)");
        let field = f.render(v);
        prop_assert_eq!(field.len(), 24);
        prop_assert_eq!(parse_real(&field).unwrap(), v);
    }

    #[test]
    fn statements_round_trip(
        values in prop::collection::vec(finite(), 0..12),
        spec in prop_oneof![Just("*"), Just("(3ES24.16E3)"), Just("(ES25.16)")],
    ) {
        let format: TextFormat = spec.parse().unwrap();
        let mut w = TextWriter::new(Vec::new());
        w.write_reals(&format, &values).unwrap();
        w.write_reals(&format, &[1.5]).unwrap();

        let mut r = TextReader::new(Cursor::new(w.into_inner()));
        prop_assert_eq!(r.read_vec(&format, values.len()).unwrap(), values);
        prop_assert_eq!(r.read_vec(&format, 1).unwrap(), vec![1.5]);
    }
}

#[cfg(feature = "serde")]
mod serde_format {
    use super::*;

    #[test]
    fn format_is_a_string() {
        let format: TextFormat = "(ES23.15)".parse().unwrap();
        let json = serde_json::to_string(&format).unwrap();
        assert_eq!(json, "\"(ES23.15)\"");
        assert_eq!(serde_json::from_str::<TextFormat>(&json).unwrap(), format);
        assert_eq!(
            serde_json::from_str::<TextFormat>("\"*\"").unwrap(),
            TextFormat::ListDirected
        );
    }

    #[test]
    fn invalid_format_string_is_rejected() {
        assert!(serde_json::from_str::<TextFormat>("\"(X10)\"").is_err());
    }
}
