use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::policy::EligibilityPolicy;
use crate::amortization::try_installment;
use crate::error::LoanEaseError;
use crate::format::one_dp;
use crate::types::*;
use crate::LoanEaseResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Loan request checked for eligibility.
///
/// `Default` yields the reference applicant that also pre-fills the decision
/// explanation before any check has been submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub loan_amount: Money,
    pub annual_rate_pct: Percent,
    pub tenure_years: u32,
    pub monthly_income: Money,
    pub credit_score: u32,
    /// EMIs already being serviced, added to the new EMI for the DTI test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_emis: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<EligibilityPolicy>,
}

impl Default for EligibilityInput {
    fn default() -> Self {
        Self {
            loan_amount: dec!(2_500_000),
            annual_rate_pct: dec!(10.0),
            tenure_years: 15,
            monthly_income: dec!(75_000),
            credit_score: 780,
            existing_emis: None,
            policy: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Eligible,
    ConditionalApproval,
    NotEligible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub emi: Money,
    pub dti_ratio_pct: Percent,
    pub credit_score: u32,
    pub decision: Decision,
    /// Failed checks, DTI first.
    pub reasons: Vec<String>,
    /// Single caller-facing sentence combining the reasons.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check a loan request against the DTI and credit-score thresholds.
///
/// Both checks are evaluated independently. A weak credit score with a
/// healthy DTI is a conditional approval; a DTI breach always blocks.
pub fn assess_eligibility(
    input: &EligibilityInput,
) -> LoanEaseResult<ComputationOutput<EligibilityVerdict>> {
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

    let policy = input.policy.clone().unwrap_or_default();

    let emi = try_installment(input.loan_amount, input.annual_rate_pct, input.tenure_years)
        .ok_or_else(|| {
            LoanEaseError::invalid("loan_amount", "Installment is beyond Decimal range.")
        })?;
    let total_emi = emi
        .checked_add(input.existing_emis.unwrap_or(Decimal::ZERO))
        .ok_or_else(|| {
            LoanEaseError::invalid("existing_emis", "Total EMI is beyond Decimal range.")
        })?;
    let dti_ratio_pct = total_emi
        .checked_div(input.monthly_income)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| {
            LoanEaseError::invalid(
                "monthly_income",
                "Monthly income is too small for the DTI to be represented.",
            )
        })?;

    let is_dti_ok = policy.dti_ok(dti_ratio_pct);
    let is_credit_ok = policy.credit_ok(input.credit_score);

    let mut reasons = Vec::new();
    if !is_dti_ok {
        reasons.push(format!(
            "High DTI ({}%) — exceeds {}% limit",
            one_dp(dti_ratio_pct),
            one_dp(policy.max_dti_pct)
        ));
    }
    if !is_credit_ok {
        reasons.push(format!(
            "Low Credit Score ({}) — minimum required is {}",
            input.credit_score, policy.min_credit_score
        ));
    }

    let (decision, message) = match (is_dti_ok, is_credit_ok) {
        (true, true) => (
            Decision::Eligible,
            format!(
                "You are Eligible! DTI: {}% | Credit Score: {}",
                one_dp(dti_ratio_pct),
                input.credit_score
            ),
        ),
        (true, false) => (
            Decision::ConditionalApproval,
            format!(
                "Conditional Approval. DTI is good, but {} might lead to rejection or higher rate.",
                reasons[0]
            ),
        ),
        (false, true) => (
            Decision::NotEligible,
            format!("Not Eligible. Primary Blocker: {}.", reasons[0]),
        ),
        (false, false) => (
            Decision::NotEligible,
            format!(
                "Not Eligible. Primary Blockers: {} and {}.",
                reasons[0], reasons[1]
            ),
        ),
    };

    debug!(%emi, %dti_ratio_pct, credit_score = input.credit_score, ?decision, "eligibility assessed");

    let output = EligibilityVerdict {
        emi,
        dti_ratio_pct,
        credit_score: input.credit_score,
        decision,
        reasons,
        message,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "max_dti_pct": policy.max_dti_pct.to_string(),
        "min_credit_score": policy.min_credit_score,
        "existing_emis": input.existing_emis.unwrap_or(Decimal::ZERO).to_string(),
    });

    Ok(with_metadata(
        "EMI-to-income (DTI) and credit score threshold test",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &EligibilityInput) -> LoanEaseResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "loan_amount",
            "Loan amount must be positive.",
        ));
    }
    if input.annual_rate_pct <= Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "annual_rate_pct",
            "Interest rate must be positive.",
        ));
    }
    if input.tenure_years == 0 {
        return Err(LoanEaseError::invalid(
            "tenure_years",
            "Tenure must be at least 1 year.",
        ));
    }
    if input.monthly_income <= Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "monthly_income",
            "Monthly income must be positive.",
        ));
    }
    if let Some(existing) = input.existing_emis {
        if existing < Decimal::ZERO {
            return Err(LoanEaseError::invalid(
                "existing_emis",
                "Existing EMIs cannot be negative.",
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
