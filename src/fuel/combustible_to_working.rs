use serde::Serialize;

use super::error::{Constraint, FuelCalcError};
use super::input::{parse_field, Field, RawValues};

/// Combustible-basis analysis together with the working sample's moisture
/// and ash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombustibleSample {
    /// H, C, S, O on the combustible basis [mass-%]
    pub hydrogen: f64,
    pub carbon: f64,
    pub sulphur: f64,
    pub oxygen: f64,
    /// Working-sample moisture W [mass-%]
    pub moisture: f64,
    /// Working-sample ash A [mass-%]
    pub ash: f64,
    /// Vanadium on the combustible basis [mg/kg]
    pub vanadium_mg_per_kg: f64,
    /// Combustible-basis lower heating value Qg [MJ/kg]
    pub q_combustible_mj: f64,
}

impl CombustibleSample {
    /// Fields in validation order.
    pub const FIELDS: [Field; 8] = [
        Field::H,
        Field::C,
        Field::S,
        Field::O,
        Field::W,
        Field::A,
        Field::V,
        Field::Qg,
    ];

    pub fn from_raw(values: &RawValues) -> Result<Self, FuelCalcError> {
        Ok(Self {
            hydrogen: parse_field(values, Field::H, true)?,
            carbon: parse_field(values, Field::C, true)?,
            sulphur: parse_field(values, Field::S, true)?,
            oxygen: parse_field(values, Field::O, true)?,
            moisture: parse_field(values, Field::W, true)?,
            ash: parse_field(values, Field::A, true)?,
            vanadium_mg_per_kg: parse_field(values, Field::V, true)?,
            q_combustible_mj: parse_field(values, Field::Qg, true)?,
        })
    }
}

/// Working-basis recast, mass-%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkingRecast {
    pub hydrogen: f64,
    pub carbon: f64,
    pub sulphur: f64,
    pub oxygen: f64,
    pub ash: f64,
}

/// Output of the combustible → working conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkingResult {
    /// Combustible → working coefficient K_gr
    pub k_gr: f64,
    pub working: WorkingRecast,
    /// Vanadium on the working basis [mg/kg]
    pub vanadium_mg_per_kg: f64,
    /// Lower heating value, working basis [MJ/kg]
    pub q_working_mj: f64,
}

/// Recasts a combustible-basis analysis onto the working basis.
///
/// Ash is scaled by K_gr like every other component even though A already
/// describes the working sample; the heating value then uses that scaled ash.
pub fn combustible_to_working(sample: &CombustibleSample) -> Result<WorkingResult, FuelCalcError> {
    let w = sample.moisture;
    let a = sample.ash;
    if w + a >= 100.0 {
        return Err(FuelCalcError::DomainViolation(
            Constraint::MoistureAshBelow100,
        ));
    }

    let k_gr = (100.0 - w - a) / 100.0;
    let working = WorkingRecast {
        hydrogen: sample.hydrogen * k_gr,
        carbon: sample.carbon * k_gr,
        sulphur: sample.sulphur * k_gr,
        oxygen: sample.oxygen * k_gr,
        ash: a * k_gr,
    };
    let vanadium_mg_per_kg = sample.vanadium_mg_per_kg * k_gr;
    let q_working_mj = sample.q_combustible_mj * (100.0 - w - working.ash) / 100.0 - 0.025 * w;

    Ok(WorkingResult {
        k_gr,
        working,
        vanadium_mg_per_kg,
        q_working_mj,
    })
}

/// Parses `values` and runs [`combustible_to_working`].
pub fn combustible_to_working_from_raw(values: &RawValues) -> Result<WorkingResult, FuelCalcError> {
    let sample = CombustibleSample::from_raw(values)?;
    combustible_to_working(&sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::*;

    fn sample(w: f64, a: f64) -> CombustibleSample {
        CombustibleSample {
            hydrogen: 5.0,
            carbon: 75.0,
            sulphur: 2.0,
            oxygen: 8.0,
            moisture: w,
            ash: a,
            vanadium_mg_per_kg: 300.0,
            q_combustible_mj: 30.0,
        }
    }

    #[test]
    fn typical_fuel_oil_residue() {
        let res = combustible_to_working(&sample(10.0, 15.0)).unwrap();
        assert_relative_eq!(res.k_gr, 0.75, epsilon = 1e-12);
        assert_relative_eq!(res.working.hydrogen, 3.75, epsilon = 1e-12);
        assert_relative_eq!(res.working.carbon, 56.25, epsilon = 1e-12);
        assert_relative_eq!(res.working.sulphur, 1.5, epsilon = 1e-12);
        assert_relative_eq!(res.working.oxygen, 6.0, epsilon = 1e-12);
        assert_relative_eq!(res.working.ash, 11.25, epsilon = 1e-12);
        assert_relative_eq!(res.vanadium_mg_per_kg, 225.0, epsilon = 1e-9);
        assert_relative_eq!(res.q_working_mj, 23.375, epsilon = 1e-12);
    }

    #[test]
    fn dry_ash_free_sample_keeps_values() {
        let res = combustible_to_working(&sample(0.0, 0.0)).unwrap();
        assert_eq!(res.k_gr, 1.0);
        assert_eq!(res.working.carbon, 75.0);
        assert_relative_eq!(res.q_working_mj, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn ash_is_scaled_by_the_coefficient() {
        let res = combustible_to_working(&sample(0.0, 40.0)).unwrap();
        assert_relative_eq!(res.working.ash, 40.0 * 0.6, epsilon = 1e-12);
        // Qg * (100 - 0 - 24) / 100
        assert_relative_eq!(res.q_working_mj, 30.0 * 0.76, epsilon = 1e-12);
    }

    #[rstest]
    #[case(60.0, 40.0)]
    #[case(100.0, 0.0)]
    #[case(99.0, 5.0)]
    fn moisture_plus_ash_must_stay_below_100(#[case] w: f64, #[case] a: f64) {
        assert_eq!(
            combustible_to_working(&sample(w, a)),
            Err(FuelCalcError::DomainViolation(
                Constraint::MoistureAshBelow100
            ))
        );
    }

    #[test]
    fn heavy_moisture_can_turn_heating_value_negative() {
        let mut s = sample(99.0, 0.5);
        s.q_combustible_mj = 1.0;
        let res = combustible_to_working(&s).unwrap();
        assert!(res.q_working_mj < 0.0, "q={}", res.q_working_mj);
    }
}
