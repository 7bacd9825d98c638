use serde::{Deserialize, Serialize};

/// Specific heating value units. Calculations stay in MJ/kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatingValueUnit {
    #[default]
    MjPerKg,
    KjPerKg,
    KcalPerKg,
    BtuPerPound,
}

impl HeatingValueUnit {
    pub const ALL: [HeatingValueUnit; 4] = [
        HeatingValueUnit::MjPerKg,
        HeatingValueUnit::KjPerKg,
        HeatingValueUnit::KcalPerKg,
        HeatingValueUnit::BtuPerPound,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            HeatingValueUnit::MjPerKg => "MJ/kg",
            HeatingValueUnit::KjPerKg => "kJ/kg",
            HeatingValueUnit::KcalPerKg => "kcal/kg",
            HeatingValueUnit::BtuPerPound => "Btu/lb",
        }
    }

    /// Accepts the display symbol (case-insensitive).
    pub fn from_symbol(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.symbol().eq_ignore_ascii_case(s))
    }
}

fn to_kj_per_kg(value: f64, unit: HeatingValueUnit) -> f64 {
    match unit {
        HeatingValueUnit::MjPerKg => value * 1000.0,
        HeatingValueUnit::KjPerKg => value,
        HeatingValueUnit::KcalPerKg => value * 4.1868,
        HeatingValueUnit::BtuPerPound => value * 2.326,
    }
}

fn from_kj_per_kg(value: f64, unit: HeatingValueUnit) -> f64 {
    match unit {
        HeatingValueUnit::MjPerKg => value / 1000.0,
        HeatingValueUnit::KjPerKg => value,
        HeatingValueUnit::KcalPerKg => value / 4.1868,
        HeatingValueUnit::BtuPerPound => value / 2.326,
    }
}

/// Converts a heating value between units.
pub fn convert_heating_value(value: f64, from: HeatingValueUnit, to: HeatingValueUnit) -> f64 {
    from_kj_per_kg(to_kj_per_kg(value, from), to)
}
