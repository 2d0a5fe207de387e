pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

pub use error::BondAmortError;
pub use types::*;

/// Standard result type for all bond-amort operations
pub type BondAmortResult<T> = Result<T, BondAmortError>;
