//! Heuristic financial risk score (0 = low risk, 100 = high risk).
//!
//! ```text
//! base      = DTI * 50 + ETI * 20            (ratios, not percent)
//! credit    = (score - 600) / 300 * 30        (subtracted)
//! collateral = 20 if secured else 0           (subtracted)
//! risk      = clamp(base - credit - collateral, 0, 100)
//! ```
//!
//! DTI is existing monthly debt over monthly income; ETI adds fixed expenses
//! to the numerator. Zero income saturates both ratios at 100.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::LoanEaseError;
use crate::types::*;
use crate::LoanEaseResult;

const INCOME_SENTINEL_RATIO: Rate = dec!(100);
const MAX_SCORE: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Weights of the linear risk blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// Points per 1.0 of DTI.
    pub dti_weight: Decimal,
    /// Points per 1.0 of ETI.
    pub eti_weight: Decimal,
    /// Credit score at which the credit modifier is zero.
    pub credit_pivot: Decimal,
    pub credit_span: Decimal,
    /// Points removed when the score is `credit_pivot + credit_span`.
    pub credit_weight: Decimal,
    pub collateral_reduction: Decimal,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            dti_weight: dec!(50),
            eti_weight: dec!(20),
            credit_pivot: dec!(600),
            credit_span: dec!(300),
            credit_weight: dec!(30),
            collateral_reduction: dec!(20),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskInput {
    pub annual_income: Money,
    pub existing_monthly_debt: Money,
    pub credit_score: u32,
    /// Rent, utilities and other fixed monthly outgoings.
    pub fixed_expenses: Money,
    #[serde(default)]
    pub has_collateral: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<RiskWeights>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskBand {
    pub fn from_score(score: Decimal) -> Self {
        if score < dec!(25) {
            RiskBand::Low
        } else if score < dec!(50) {
            RiskBand::Moderate
        } else if score < dec!(75) {
            RiskBand::Elevated
        } else {
            RiskBand::High
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            RiskBand::Low => {
                "Excellent financial health, especially if collateral is provided."
            }
            RiskBand::Moderate => "Good standing. Your obligations are manageable.",
            RiskBand::Elevated => {
                "Your financial profile shows potential stress. The presence of collateral \
                 helps, but focus on debt reduction."
            }
            RiskBand::High => {
                "Significant portion of your income is consumed by debt and expenses, \
                 and/or your credit score is low."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub monthly_income: Money,
    pub dti_ratio: Rate,
    /// (debt + fixed expenses) / income
    pub obligation_ratio: Rate,
    pub base_risk: Decimal,
    pub credit_modifier: Decimal,
    pub collateral_reduction: Decimal,
    pub risk_score: Decimal,
    pub band: RiskBand,
    pub interpretation: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn assess_risk(input: &RiskInput) -> LoanEaseResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    warn_outside_range(
        &mut warnings,
        "Credit score",
        Decimal::from(input.credit_score),
        dec!(300),
        dec!(900),
    );

    let w = input.weights.clone().unwrap_or_default();
    let monthly_income = input.annual_income / dec!(12);

    let (dti_ratio, obligation_ratio) = if monthly_income > Decimal::ZERO {
        match debt_ratios(input, monthly_income) {
            Some(ratios) => ratios,
            None => {
                warnings.push(
                    "Debt ratios exceed Decimal range; set to the maximum-risk sentinel".into(),
                );
                (INCOME_SENTINEL_RATIO, INCOME_SENTINEL_RATIO)
            }
        }
    } else {
        warnings.push("Monthly income is zero; debt ratios set to the maximum-risk sentinel".into());
        (INCOME_SENTINEL_RATIO, INCOME_SENTINEL_RATIO)
    };

    let base_risk = dti_ratio
        .checked_mul(w.dti_weight)
        .zip(obligation_ratio.checked_mul(w.eti_weight))
        .and_then(|(dti_points, eti_points)| dti_points.checked_add(eti_points))
        .unwrap_or_else(|| {
            warnings.push("Base risk exceeds Decimal range; saturated".into());
            Decimal::MAX
        });
    let credit_modifier = if w.credit_span.is_zero() {
        warnings.push("credit_span is zero; credit modifier ignored".into());
        Decimal::ZERO
    } else {
        Decimal::from(input.credit_score)
            .checked_sub(w.credit_pivot)
            .and_then(|offset| offset.checked_div(w.credit_span))
            .and_then(|scaled| scaled.checked_mul(w.credit_weight))
            .unwrap_or_else(|| {
                warnings.push("Credit modifier exceeds Decimal range; ignored".into());
                Decimal::ZERO
            })
    };
    let collateral_reduction = if input.has_collateral {
        w.collateral_reduction
    } else {
        Decimal::ZERO
    };

    // Overflow here only happens above the scale, so it saturates at the top
    let risk_score = base_risk
        .checked_sub(credit_modifier)
        .and_then(|s| s.checked_sub(collateral_reduction))
        .unwrap_or(MAX_SCORE)
        .max(Decimal::ZERO)
        .min(MAX_SCORE);
    let band = RiskBand::from_score(risk_score);

    debug!(%dti_ratio, %obligation_ratio, %risk_score, ?band, "risk assessed");

    let output = RiskAssessment {
        monthly_income,
        dti_ratio,
        obligation_ratio,
        base_risk,
        credit_modifier,
        collateral_reduction,
        risk_score,
        band,
        interpretation: band.interpretation().to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::to_value(&w)?;

    Ok(with_metadata(
        "Linear DTI/ETI risk blend with credit and collateral adjustments",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// DTI and ETI over a positive monthly income. `None` on overflow.
fn debt_ratios(input: &RiskInput, monthly_income: Money) -> Option<(Rate, Rate)> {
    let dti = input.existing_monthly_debt.checked_div(monthly_income)?;
    let eti = input
        .existing_monthly_debt
        .checked_add(input.fixed_expenses)?
        .checked_div(monthly_income)?;
    Some((dti, eti))
}

fn validate_input(input: &RiskInput) -> LoanEaseResult<()> {
    if input.annual_income < Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "annual_income",
            "Annual income cannot be negative.",
        ));
    }
    if input.existing_monthly_debt < Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "existing_monthly_debt",
            "Existing monthly debt cannot be negative.",
        ));
    }
    if input.fixed_expenses < Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "fixed_expenses",
            "Fixed expenses cannot be negative.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
