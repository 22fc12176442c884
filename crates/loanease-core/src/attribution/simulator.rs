//! Simulated feature attribution of a loan approval probability.
//!
//! This is not a Shapley computation: every contribution comes from a fixed
//! threshold table (see [`super::rules`]). The contributions are additive by
//! construction, `baseline + Σ contributions` is the unclamped probability.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::rules::Feature;
use crate::amortization::compute_installment;
use crate::error::LoanEaseError;
use crate::types::*;
use crate::LoanEaseResult;

pub const BASELINE_PROBABILITY: Rate = dec!(0.50);
const MIN_PROBABILITY: Rate = dec!(0.01);
const MAX_PROBABILITY: Rate = dec!(0.99);
const DTI_SENTINEL_PCT: Percent = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionInput {
    pub credit_score: u32,
    pub monthly_income: Money,
    pub loan_amount: Money,
    pub tenure_years: u32,
    pub annual_rate_pct: Percent,
}

#[cfg(feature = "eligibility")]
impl From<&crate::eligibility::EligibilityInput> for AttributionInput {
    /// Reuse the inputs of the last eligibility check.
    fn from(e: &crate::eligibility::EligibilityInput) -> Self {
        Self {
            credit_score: e.credit_score,
            monthly_income: e.monthly_income,
            loan_amount: e.loan_amount,
            tenure_years: e.tenure_years,
            annual_rate_pct: e.annual_rate_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionGroup {
    Positive,
    Negative,
}

impl ContributionGroup {
    pub fn of(value: Decimal) -> Self {
        if value > Decimal::ZERO {
            ContributionGroup::Positive
        } else {
            ContributionGroup::Negative
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: Feature,
    pub label: String,
    /// Signed contribution in probability units (0.05 = +5 pp).
    pub value: Decimal,
    pub group: ContributionGroup,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    LikelyApproved,
    LikelyRejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionResult {
    pub emi: Money,
    pub dti_ratio_pct: Percent,
    pub baseline_probability: Rate,
    /// baseline + Σ contributions, before clamping.
    pub unclamped_probability: Rate,
    /// Clamped to [0.01, 0.99].
    pub final_probability: Rate,
    /// (final - baseline) in percentage points.
    pub delta_points: Decimal,
    pub outcome: Outcome,
    pub contributions: Vec<Contribution>,
}

impl AttributionResult {
    /// Contributions ordered from most negative to most positive.
    pub fn ranked(&self) -> Vec<&Contribution> {
        let mut ranked: Vec<&Contribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| a.value.cmp(&b.value));
        ranked
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn simulate_attribution(
    input: &AttributionInput,
) -> LoanEaseResult<ComputationOutput<AttributionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let emi = compute_installment(input.loan_amount, input.annual_rate_pct, input.tenure_years);
    let dti_ratio_pct = if input.monthly_income > Decimal::ZERO {
        emi.checked_div(input.monthly_income)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .unwrap_or_else(|| {
                warnings.push("DTI exceeds Decimal range; set to 100%".into());
                DTI_SENTINEL_PCT
            })
    } else {
        warnings.push("Monthly income is zero; DTI set to 100%".into());
        DTI_SENTINEL_PCT
    };

    let mut contributions = Vec::with_capacity(Feature::ALL.len());
    for feature in Feature::ALL {
        let measured = match feature {
            Feature::CreditScore => Decimal::from(input.credit_score),
            Feature::DebtToIncome => dti_ratio_pct,
            Feature::MonthlyIncome => input.monthly_income,
        };
        let rule = feature.bucket(measured).ok_or_else(|| {
            LoanEaseError::InsufficientData(format!("No bucket matches {feature:?} = {measured}"))
        })?;
        contributions.push(Contribution {
            feature,
            label: feature.label(measured),
            value: rule.value,
            group: ContributionGroup::of(rule.value),
            description: feature.describe(rule, measured),
        });
    }

    let unclamped_probability =
        BASELINE_PROBABILITY + contributions.iter().map(|c| c.value).sum::<Decimal>();
    let final_probability = unclamped_probability
        .max(MIN_PROBABILITY)
        .min(MAX_PROBABILITY);
    let outcome = if final_probability >= dec!(0.5) {
        Outcome::LikelyApproved
    } else {
        Outcome::LikelyRejected
    };

    debug!(%dti_ratio_pct, %unclamped_probability, %final_probability, ?outcome, "attribution simulated");

    let output = AttributionResult {
        emi,
        dti_ratio_pct,
        baseline_probability: BASELINE_PROBABILITY,
        unclamped_probability,
        final_probability,
        delta_points: (final_probability - BASELINE_PROBABILITY) * dec!(100),
        outcome,
        contributions,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "baseline_probability": BASELINE_PROBABILITY.to_string(),
        "probability_bounds": [MIN_PROBABILITY.to_string(), MAX_PROBABILITY.to_string()],
        "model": "threshold buckets (simulated, not model-derived)",
    });

    Ok(with_metadata(
        "Simulated additive feature attribution",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
