pub mod amortization;
pub mod dates;
pub mod error;
pub mod types;

pub use error::LoanSimError;
pub use types::*;

/// Standard result type for all loan-sim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
