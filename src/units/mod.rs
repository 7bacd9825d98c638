//! Unit definitions and conversions.

pub mod heating_value;

pub use heating_value::{convert_heating_value, HeatingValueUnit};
