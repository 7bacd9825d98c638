//! Raw form values → numbers.
//!
//! Users type Ukrainian-locale decimals, so a comma is accepted as the decimal
//! separator. Every comma becomes a dot, which makes `"1,000"` read as `1.0`
//! rather than one thousand.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::FuelCalcError;

/// Raw text values keyed by field key (`"H"`, `"Qg"`, ...).
pub type RawValues = HashMap<String, String>;

/// Recognized input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// Hydrogen, mass-%
    H,
    /// Carbon, mass-%
    C,
    /// Sulphur, mass-%
    S,
    /// Nitrogen, mass-%
    N,
    /// Oxygen, mass-%
    O,
    /// Moisture, mass-%
    W,
    /// Ash, mass-%
    A,
    /// Vanadium, mg/kg
    V,
    /// Lower heating value on the combustible basis, MJ/kg
    Qg,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::H,
        Field::C,
        Field::S,
        Field::N,
        Field::O,
        Field::W,
        Field::A,
        Field::V,
        Field::Qg,
    ];

    /// Form key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::H => "H",
            Field::C => "C",
            Field::S => "S",
            Field::N => "N",
            Field::O => "O",
            Field::W => "W",
            Field::A => "A",
            Field::V => "V",
            Field::Qg => "Qg",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Unit label shown next to the input.
    pub fn unit(&self) -> &'static str {
        match self {
            Field::V => "mg/kg",
            Field::Qg => "MJ/kg",
            _ => "%",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalizes one raw value: trims it and swaps decimal commas for dots.
/// Returns `None` for an empty (or whitespace-only) value.
pub fn normalize_decimal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.replace(',', "."))
    }
}

/// Reads `field` from `values`. A missing key counts as empty; an empty
/// optional field yields `0.0`.
pub fn parse_field(values: &RawValues, field: Field, required: bool) -> Result<f64, FuelCalcError> {
    let raw = values.get(field.key()).map(String::as_str).unwrap_or("");
    let Some(text) = normalize_decimal(raw) else {
        return if required {
            Err(FuelCalcError::MissingField { field })
        } else {
            Ok(0.0)
        };
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FuelCalcError::NonNumeric { field }),
    }
}

/// Builds a [`RawValues`] map from `(key, value)` pairs.
pub fn raw_values<'a, I>(pairs: I) -> RawValues
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn one(field: Field, raw: &str) -> RawValues {
        raw_values([(field.key(), raw)])
    }

    #[rstest]
    #[case("1,5")]
    #[case("1.5")]
    #[case("  1.5  ")]
    #[case("  1,5  ")]
    #[case("\t1,5\n")]
    fn comma_and_whitespace_are_equivalent(#[case] raw: &str) {
        assert_eq!(parse_field(&one(Field::H, raw), Field::H, true), Ok(1.5));
    }

    #[test]
    fn thousands_separator_is_read_as_decimal() {
        assert_eq!(parse_field(&one(Field::C, "1,000"), Field::C, true), Ok(1.0));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn empty_required_field_is_missing(#[case] raw: &str) {
        assert_eq!(
            parse_field(&one(Field::W, raw), Field::W, true),
            Err(FuelCalcError::MissingField { field: Field::W })
        );
    }

    #[test]
    fn absent_key_is_treated_as_empty() {
        let values = RawValues::new();
        assert_eq!(
            parse_field(&values, Field::Qg, true),
            Err(FuelCalcError::MissingField { field: Field::Qg })
        );
        assert_eq!(parse_field(&values, Field::Qg, false), Ok(0.0));
    }

    #[rstest]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("1,5,0")]
    #[case("inf")]
    #[case("NaN")]
    #[case("1e999")]
    fn non_numeric_or_non_finite_is_rejected(#[case] raw: &str) {
        assert_eq!(
            parse_field(&one(Field::S, raw), Field::S, true),
            Err(FuelCalcError::NonNumeric { field: Field::S })
        );
    }

    #[test]
    fn garbage_in_optional_field_is_still_an_error() {
        assert_eq!(
            parse_field(&one(Field::V, "x"), Field::V, false),
            Err(FuelCalcError::NonNumeric { field: Field::V })
        );
    }

    #[rstest]
    #[case("-3,25", -3.25)]
    #[case("+2", 2.0)]
    #[case("1e1", 10.0)]
    #[case(",5", 0.5)]
    fn accepts_other_float_forms(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(parse_field(&one(Field::O, raw), Field::O, true), Ok(expected));
    }

    #[test]
    fn keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("q"), None);
    }
}
