use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BondAmortError {
    #[error("Invalid term: {field}: {reason}")]
    InvalidTerm { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),
}

impl BondAmortError {
    pub(crate) fn invalid_term(field: &str, reason: impl Into<String>) -> Self {
        BondAmortError::InvalidTerm {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
