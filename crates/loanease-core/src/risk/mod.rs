pub mod score;

pub use score::{assess_risk, RiskAssessment, RiskBand, RiskInput, RiskWeights};
