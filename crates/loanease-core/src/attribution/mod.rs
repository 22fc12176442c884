pub mod rules;
pub mod simulator;

#[cfg(feature = "approval_model")]
pub mod model;

pub use rules::{Bound, BucketRule, Feature};
pub use simulator::{
    simulate_attribution, AttributionInput, AttributionResult, Contribution, ContributionGroup,
    Outcome,
};
