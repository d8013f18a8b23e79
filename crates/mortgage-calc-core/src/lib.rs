pub mod amortization;
pub mod calculators;
pub mod error;
pub mod render;
pub mod types;
pub mod validation;

pub use calculators::{calculate, run, validate, CalculatorKind};
pub use error::CalcError;
pub use types::*;
pub use validation::{ValidationErrors, ValidationOutcome};

/// Standard result type for all calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
