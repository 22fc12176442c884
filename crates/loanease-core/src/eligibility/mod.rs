pub mod policy;
pub mod verdict;

pub use policy::EligibilityPolicy;
pub use verdict::{assess_eligibility, Decision, EligibilityInput, EligibilityVerdict};
