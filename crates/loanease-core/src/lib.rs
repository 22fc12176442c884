pub mod amortization;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "attribution")]
pub mod attribution;

pub use error::LoanEaseError;
pub use types::*;

/// Standard result type for all loanease operations
pub type LoanEaseResult<T> = Result<T, LoanEaseError>;
