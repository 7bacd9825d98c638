use serde::{Deserialize, Serialize};

use super::combustible_to_working::{
    combustible_to_working_from_raw, CombustibleSample, WorkingResult,
};
use super::error::FuelCalcError;
use super::input::{Field, RawValues};
use super::working_to_dry::{working_to_dry_from_raw, DryCombustibleResult, WorkingComposition};

/// Which conversion to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalcMode {
    /// Task 1: working → dry & combustible
    #[default]
    WorkingToDry,
    /// Task 2: combustible → working
    CombustibleToWorking,
}

impl CalcMode {
    /// Interprets a `mode` form/query parameter. Only the exact string `"2"`
    /// selects the combustible → working task; anything else falls back to
    /// task 1, padded values included.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("2") => CalcMode::CombustibleToWorking,
            _ => CalcMode::WorkingToDry,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            CalcMode::WorkingToDry => "1",
            CalcMode::CombustibleToWorking => "2",
        }
    }

    /// Required input fields, in the order they are validated.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            CalcMode::WorkingToDry => &WorkingComposition::FIELDS,
            CalcMode::CombustibleToWorking => &CombustibleSample::FIELDS,
        }
    }
}

/// Result of [`compute`]; the variant always matches the requested mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalcResult {
    WorkingToDry(DryCombustibleResult),
    CombustibleToWorking(WorkingResult),
}

impl CalcResult {
    pub fn mode(&self) -> CalcMode {
        match self {
            CalcResult::WorkingToDry(_) => CalcMode::WorkingToDry,
            CalcResult::CombustibleToWorking(_) => CalcMode::CombustibleToWorking,
        }
    }

    /// Every lower heating value in the result [MJ/kg].
    pub fn heating_values_mj(&self) -> Vec<f64> {
        match self {
            CalcResult::WorkingToDry(r) => vec![r.q_working_mj, r.q_dry_mj, r.q_combustible_mj],
            CalcResult::CombustibleToWorking(r) => vec![r.q_working_mj],
        }
    }
}

/// Runs the calculation selected by `mode` on raw form values.
pub fn compute(mode: CalcMode, values: &RawValues) -> Result<CalcResult, FuelCalcError> {
    match mode {
        CalcMode::WorkingToDry => working_to_dry_from_raw(values).map(CalcResult::WorkingToDry),
        CalcMode::CombustibleToWorking => {
            combustible_to_working_from_raw(values).map(CalcResult::CombustibleToWorking)
        }
    }
}

/// Non-blocking note about a successful calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// At least one lower heating value came out negative.
    NegativeHeatingValue,
    /// Working-basis components (with W and A) do not add up to ~100 %.
    CompositionSum { total: f64 },
}

/// Allowed gap between the working-basis total and 100 % before flagging it.
pub const COMPOSITION_SUM_TOLERANCE: f64 = 1.0;

/// Collects advisories for a result. Inputs that fail to parse produce none.
pub fn advisories(values: &RawValues, result: &CalcResult) -> Vec<Advisory> {
    let mut notes = Vec::new();
    if result.heating_values_mj().iter().any(|q| *q < 0.0) {
        notes.push(Advisory::NegativeHeatingValue);
    }
    if let CalcResult::WorkingToDry(_) = result {
        if let Ok(comp) = WorkingComposition::from_raw(values) {
            let total = comp.total();
            if (total - 100.0).abs() > COMPOSITION_SUM_TOLERANCE {
                notes.push(Advisory::CompositionSum { total });
            }
        }
    }
    notes
}
