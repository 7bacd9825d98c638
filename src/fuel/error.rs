use thiserror::Error;

use super::input::Field;

/// Domain constraint that rejected an otherwise well-formed input set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// W < 100
    MoistureBelow100,
    /// W + A < 100
    MoistureAshBelow100,
}

impl Constraint {
    pub fn expression(&self) -> &'static str {
        match self {
            Constraint::MoistureBelow100 => "W < 100",
            Constraint::MoistureAshBelow100 => "W + A < 100",
        }
    }
}

/// Error returned by the fuel calculations. The user-facing (localized) text
/// is produced by [`crate::i18n::localize_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FuelCalcError {
    #[error("field {field} is required")]
    MissingField { field: Field },
    #[error("field {field} must be a number")]
    NonNumeric { field: Field },
    #[error("constraint violated: {}", .0.expression())]
    DomainViolation(Constraint),
}
