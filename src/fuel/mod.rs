//! Solid-fuel composition conversions and lower heating value estimates.

pub mod combustible_to_working;
pub mod compute;
pub mod error;
pub mod input;
pub mod working_to_dry;

pub use combustible_to_working::*;
pub use compute::*;
pub use error::*;
pub use input::{normalize_decimal, parse_field, raw_values, Field, RawValues};
pub use working_to_dry::*;
