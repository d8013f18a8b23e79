use rust_decimal::Decimal;
use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Down payment ({down_payment}) cannot exceed home price ({home_price})")]
    DownPaymentExceedsHomePrice {
        down_payment: Decimal,
        home_price: Decimal,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CalcError {
    /// Field-level errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CalcError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CalcError {
    fn from(errors: ValidationErrors) -> Self {
        CalcError::Validation(errors)
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError(e.to_string())
    }
}
