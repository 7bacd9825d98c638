use serde::Serialize;

use super::error::{Constraint, FuelCalcError};
use super::input::{parse_field, Field, RawValues};

/// Working-basis elemental analysis, mass-%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingComposition {
    pub hydrogen: f64,
    pub carbon: f64,
    pub sulphur: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
    pub moisture: f64,
    pub ash: f64,
}

impl WorkingComposition {
    /// Fields in validation order.
    pub const FIELDS: [Field; 7] = [
        Field::H,
        Field::C,
        Field::S,
        Field::N,
        Field::O,
        Field::W,
        Field::A,
    ];

    /// Parses all fields in order, stopping at the first bad one.
    pub fn from_raw(values: &RawValues) -> Result<Self, FuelCalcError> {
        Ok(Self {
            hydrogen: parse_field(values, Field::H, true)?,
            carbon: parse_field(values, Field::C, true)?,
            sulphur: parse_field(values, Field::S, true)?,
            nitrogen: parse_field(values, Field::N, true)?,
            oxygen: parse_field(values, Field::O, true)?,
            moisture: parse_field(values, Field::W, true)?,
            ash: parse_field(values, Field::A, true)?,
        })
    }

    fn validate(&self) -> Result<(), FuelCalcError> {
        if self.moisture >= 100.0 {
            return Err(FuelCalcError::DomainViolation(Constraint::MoistureBelow100));
        }
        if self.moisture + self.ash >= 100.0 {
            return Err(FuelCalcError::DomainViolation(
                Constraint::MoistureAshBelow100,
            ));
        }
        Ok(())
    }

    /// Sum of every component including moisture and ash, mass-%.
    pub fn total(&self) -> f64 {
        self.hydrogen
            + self.carbon
            + self.sulphur
            + self.nitrogen
            + self.oxygen
            + self.moisture
            + self.ash
    }
}

/// Dry-basis recast, mass-%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DryComposition {
    pub hydrogen: f64,
    pub carbon: f64,
    pub sulphur: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
    pub ash: f64,
}

/// Combustible (dry-ash-free) recast, mass-%. Ash is zero on this basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombustibleComposition {
    pub hydrogen: f64,
    pub carbon: f64,
    pub sulphur: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
}

/// Output of the working → dry & combustible conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DryCombustibleResult {
    /// Working → dry coefficient K_rs
    pub k_rs: f64,
    /// Working → combustible coefficient K_rg
    pub k_rg: f64,
    pub dry: DryComposition,
    pub combustible: CombustibleComposition,
    /// Lower heating value, working basis [MJ/kg]
    pub q_working_mj: f64,
    /// Lower heating value, dry basis [MJ/kg]
    pub q_dry_mj: f64,
    /// Lower heating value, combustible basis [MJ/kg]
    pub q_combustible_mj: f64,
}

/// Mendeleev estimate of the working-basis lower heating value [kJ/kg].
pub fn mendeleev_lhv_kj(c: &WorkingComposition) -> f64 {
    339.0 * c.carbon + 1030.0 * c.hydrogen - 108.8 * (c.oxygen - c.sulphur) - 25.0 * c.moisture
}

/// Recasts a working-basis analysis onto the dry and combustible bases and
/// estimates the lower heating value on all three.
pub fn working_to_dry(comp: &WorkingComposition) -> Result<DryCombustibleResult, FuelCalcError> {
    comp.validate()?;
    let w = comp.moisture;
    let a = comp.ash;

    let k_rs = 100.0 / (100.0 - w);
    let k_rg = 100.0 / (100.0 - w - a);

    let dry = DryComposition {
        hydrogen: comp.hydrogen * k_rs,
        carbon: comp.carbon * k_rs,
        sulphur: comp.sulphur * k_rs,
        nitrogen: comp.nitrogen * k_rs,
        oxygen: comp.oxygen * k_rs,
        ash: a * k_rs,
    };
    let combustible = CombustibleComposition {
        hydrogen: comp.hydrogen * k_rg,
        carbon: comp.carbon * k_rg,
        sulphur: comp.sulphur * k_rg,
        nitrogen: comp.nitrogen * k_rg,
        oxygen: comp.oxygen * k_rg,
    };

    let q_r_kj = mendeleev_lhv_kj(comp);
    // latent-heat term added back before rescaling to a water-free basis
    let q_moisture_free_kj = q_r_kj + 0.025 * w;
    let q_s_kj = q_moisture_free_kj * 100.0 / (100.0 - w);
    let q_g_kj = q_moisture_free_kj * 100.0 / (100.0 - w - a);

    Ok(DryCombustibleResult {
        k_rs,
        k_rg,
        dry,
        combustible,
        q_working_mj: q_r_kj / 1000.0,
        q_dry_mj: q_s_kj / 1000.0,
        q_combustible_mj: q_g_kj / 1000.0,
    })
}

/// Parses `values` and runs [`working_to_dry`].
pub fn working_to_dry_from_raw(values: &RawValues) -> Result<DryCombustibleResult, FuelCalcError> {
    let comp = WorkingComposition::from_raw(values)?;
    working_to_dry(&comp)
}
