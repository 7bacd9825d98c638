use coal_fuel_calculator::fuel::{
    compute, raw_values, CalcMode, Constraint, Field, FuelCalcError, RawValues,
};
use rstest::*;

#[fixture]
fn working_sample() -> RawValues {
    raw_values([
        ("H", "4"),
        ("C", "60"),
        ("S", "1"),
        ("N", "1"),
        ("O", "10"),
        ("W", "8"),
        ("A", "20"),
    ])
}

#[rstest]
#[case("W", "", FuelCalcError::MissingField { field: Field::W })]
#[case("W", "   ", FuelCalcError::MissingField { field: Field::W })]
#[case("C", "abc", FuelCalcError::NonNumeric { field: Field::C })]
#[case("O", "1.2.3", FuelCalcError::NonNumeric { field: Field::O })]
#[case("W", "100", FuelCalcError::DomainViolation(Constraint::MoistureBelow100))]
#[case("A", "92", FuelCalcError::DomainViolation(Constraint::MoistureAshBelow100))]
fn single_bad_field(
    mut working_sample: RawValues,
    #[case] key: &str,
    #[case] raw: &str,
    #[case] expected: FuelCalcError,
) {
    working_sample.insert(key.into(), raw.into());
    assert_eq!(compute(CalcMode::WorkingToDry, &working_sample), Err(expected));
}

#[rstest]
fn absent_key_counts_as_missing(mut working_sample: RawValues) {
    working_sample.remove("N");
    assert_eq!(
        compute(CalcMode::WorkingToDry, &working_sample),
        Err(FuelCalcError::MissingField { field: Field::N })
    );
}

#[rstest]
fn earliest_field_wins(mut working_sample: RawValues) {
    working_sample.insert("S".into(), "".into());
    working_sample.insert("H".into(), "x".into());
    assert_eq!(
        compute(CalcMode::WorkingToDry, &working_sample),
        Err(FuelCalcError::NonNumeric { field: Field::H })
    );
}

#[rstest]
#[case("0", "0")]
#[case("0", "35")]
#[case("50", "49")]
#[case("99,9", "0")]
fn accepted_boundaries(mut working_sample: RawValues, #[case] w: &str, #[case] a: &str) {
    working_sample.insert("W".into(), w.into());
    working_sample.insert("A".into(), a.into());
    assert!(compute(CalcMode::WorkingToDry, &working_sample).is_ok());
}

#[rstest]
#[case("1,5")]
#[case("1.5")]
#[case("  1.5  ")]
#[case("  1,5  ")]
fn decimal_spellings_agree(mut working_sample: RawValues, #[case] raw: &str) {
    let mut reference = working_sample.clone();
    reference.insert("S".into(), "1.5".into());
    working_sample.insert("S".into(), raw.into());
    assert_eq!(
        compute(CalcMode::WorkingToDry, &working_sample),
        compute(CalcMode::WorkingToDry, &reference)
    );
}

#[test]
fn combustible_mode_checks_its_own_fields() {
    let values = raw_values([
        ("H", "5"),
        ("C", "75"),
        ("S", "2"),
        ("O", "8"),
        ("W", "10"),
        ("A", "15"),
        ("V", "many"),
        ("Qg", "30"),
    ]);
    assert_eq!(
        compute(CalcMode::CombustibleToWorking, &values),
        Err(FuelCalcError::NonNumeric { field: Field::V })
    );
}
