use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// Lending thresholds applied by the eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    /// Highest acceptable EMI-to-income ratio, in percent.
    pub max_dti_pct: Percent,
    /// Lowest acceptable credit score.
    pub min_credit_score: u32,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            max_dti_pct: dec!(40.0),
            min_credit_score: 650,
        }
    }
}

impl EligibilityPolicy {
    pub fn dti_ok(&self, dti_ratio_pct: Percent) -> bool {
        dti_ratio_pct <= self.max_dti_pct
    }

    pub fn credit_ok(&self, credit_score: u32) -> bool {
        credit_score >= self.min_credit_score
    }
}
