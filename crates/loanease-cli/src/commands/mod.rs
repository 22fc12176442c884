pub mod eligibility;
pub mod explain;
pub mod loan;
pub mod risk;
