use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::emi::{monthly_rate, num_periods, try_installment, MONTHS_PER_YEAR};
use crate::error::LoanEaseError;
use crate::types::*;
use crate::LoanEaseResult;

/// Sample every `SAMPLE_EVERY`-th period into the summary (quarterly).
const SAMPLE_EVERY: u32 = 3;

/// Residual balance small enough to be swept into the final installment.
const SETTLEMENT_TOLERANCE: Decimal = dec!(0.01);

/// A single month in the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: u32,
    /// Loan year the period falls in (1-based).
    pub year: u32,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
}

/// Quarterly-sampled schedule plus totals accumulated over every period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub periods: Vec<PeriodRecord>,
    pub total_interest: Money,
    pub total_payable: Money,
}

impl AmortizationSummary {
    /// Balance after the last sampled period, if any period was sampled.
    pub fn final_balance(&self) -> Option<Money> {
        self.periods.last().map(|p| p.remaining_balance)
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Output of the loan cost calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCostOutput {
    pub emi: Money,
    pub num_periods: u32,
    pub total_interest: Money,
    pub total_payable: Money,
    pub schedule: Vec<PeriodRecord>,
}

/// Walk the loan month by month, splitting each installment into interest and
/// principal. Only every third period and the final period are retained;
/// totals cover all periods.
///
/// Returns an empty summary with zero totals when there are no periods, the
/// installment is zero, or the walk leaves Decimal range.
pub fn build_amortization_summary(
    principal: Money,
    annual_rate_pct: Percent,
    installment: Money,
    tenure_years: u32,
) -> AmortizationSummary {
    try_amortization_summary(principal, annual_rate_pct, installment, tenure_years)
        .unwrap_or_else(|| {
            debug!(%principal, %annual_rate_pct, %installment, "amortization exceeds decimal range");
            AmortizationSummary::default()
        })
}

/// Checked walk behind [`build_amortization_summary`]. `None` on overflow.
fn try_amortization_summary(
    principal: Money,
    annual_rate_pct: Percent,
    installment: Money,
    tenure_years: u32,
) -> Option<AmortizationSummary> {
    let r = monthly_rate(annual_rate_pct);
    let n = num_periods(tenure_years);

    if n == 0 || installment.is_zero() {
        return Some(AmortizationSummary::default());
    }

    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut periods = Vec::with_capacity((n / SAMPLE_EVERY + 1) as usize);

    for period in 1..=n {
        let mut interest = balance.checked_mul(r)?;
        let mut principal_paid = installment.checked_sub(interest)?;

        // Final-period correction: never overpay, and sweep rounding residue
        let overpays = principal_paid > balance;
        let residue = period == n
            && balance.checked_sub(principal_paid)?.abs() <= SETTLEMENT_TOLERANCE;
        if overpays || residue {
            principal_paid = balance;
            interest = installment.checked_sub(principal_paid)?;
        }

        balance = balance.checked_sub(principal_paid)?;
        total_interest = total_interest.checked_add(interest)?;

        if period % SAMPLE_EVERY == 0 || period == n {
            periods.push(PeriodRecord {
                period,
                year: (period - 1) / MONTHS_PER_YEAR + 1,
                principal_component: principal_paid,
                interest_component: interest,
                remaining_balance: balance,
            });
        }
    }

    debug!(
        periods = n,
        sampled = periods.len(),
        %total_interest,
        final_balance = %balance,
        "built amortization summary"
    );

    Some(AmortizationSummary {
        periods,
        total_interest,
        total_payable: principal.checked_add(total_interest)?,
    })
}

/// Full repayment picture for a loan: EMI, total interest, total payable and
/// the quarterly schedule.
pub fn calculate_loan_cost(
    input: &LoanParameters,
) -> LoanEaseResult<ComputationOutput<LoanCostOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    warn_outside_range(
        &mut warnings,
        "Principal",
        input.principal,
        dec!(100_000),
        dec!(10_000_000),
    );
    warn_outside_range(
        &mut warnings,
        "Annual rate (%)",
        input.annual_rate_pct,
        dec!(1),
        dec!(25),
    );
    warn_outside_range(
        &mut warnings,
        "Tenure (years)",
        Decimal::from(input.tenure_years),
        dec!(1),
        dec!(30),
    );

    let emi = try_installment(input.principal, input.annual_rate_pct, input.tenure_years)
        .ok_or_else(out_of_range)?;
    let summary =
        try_amortization_summary(input.principal, input.annual_rate_pct, emi, input.tenure_years)
            .ok_or_else(out_of_range)?;

    // The sweep settles anything within tolerance, so a balance left here
    // means the installment lost the amortizing term to Decimal precision.
    if let Some(last) = summary.final_balance() {
        if last > SETTLEMENT_TOLERANCE {
            warnings.push(format!(
                "Installment does not amortize the loan at Decimal precision; \
                 {last} remains after the final period"
            ));
        }
    }

    let output = LoanCostOutput {
        emi,
        num_periods: input.num_periods(),
        total_interest: summary.total_interest,
        total_payable: summary.total_payable,
        schedule: summary.periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": monthly_rate(input.annual_rate_pct).to_string(),
        "compounding": "monthly",
        "schedule_sampling": "every 3rd period plus final period",
    });

    Ok(with_metadata(
        "Reducing-balance EMI with monthly amortization",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn out_of_range() -> LoanEaseError {
    LoanEaseError::invalid(
        "principal",
        "Loan amount and rate put the repayment beyond Decimal range.",
    )
}

fn validate_input(input: &LoanParameters) -> LoanEaseResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "principal",
            "Loan principal must be positive.",
        ));
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(LoanEaseError::invalid(
            "annual_rate_pct",
            "Interest rate cannot be negative.",
        ));
    }
    if input.tenure_years == 0 {
        return Err(LoanEaseError::invalid(
            "tenure_years",
            "Tenure must be at least 1 year.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::compute_installment;
    use rust_decimal_macros::dec;

    fn reference_loan() -> LoanParameters {
        LoanParameters {
            principal: dec!(2_500_000),
            annual_rate_pct: dec!(10),
            tenure_years: 15,
        }
    }

    #[test]
    fn test_quarterly_sampling() {
        let emi = compute_installment(dec!(100_000), dec!(12), 1);
        let summary = build_amortization_summary(dec!(100_000), dec!(12), emi, 1);
        let sampled: Vec<u32> = summary.periods.iter().map(|p| p.period).collect();
        assert_eq!(sampled, vec![3, 6, 9, 12]);
    }

    #[test]
    fn test_final_period_always_sampled() {
        // 24 periods: the final period is also a quarter boundary
        let emi = compute_installment(dec!(50_000), dec!(9), 2);
        let summary = build_amortization_summary(dec!(50_000), dec!(9), emi, 2);
        assert_eq!(summary.periods.len(), 8);
        assert_eq!(summary.periods.last().map(|p| p.period), Some(24));
        assert_eq!(summary.periods.last().map(|p| p.year), Some(2));
    }

    #[test]
    fn test_balance_reaches_zero() {
        let p = reference_loan();
        let emi = compute_installment(p.principal, p.annual_rate_pct, p.tenure_years);
        let summary = build_amortization_summary(p.principal, p.annual_rate_pct, emi, p.tenure_years);
        assert_eq!(summary.final_balance(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_balance_non_increasing() {
        let emi = compute_installment(dec!(750_000), dec!(8.5), 5);
        let summary = build_amortization_summary(dec!(750_000), dec!(8.5), emi, 5);
        for pair in summary.periods.windows(2) {
            assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
            assert!(pair[1].remaining_balance >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_components_sum_to_installment() {
        let emi = compute_installment(dec!(300_000), dec!(11), 3);
        let summary = build_amortization_summary(dec!(300_000), dec!(11), emi, 3);
        for rec in &summary.periods {
            let paid = rec.principal_component + rec.interest_component;
            assert!((paid - emi).abs() < dec!(0.0000001));
        }
    }

    #[test]
    fn test_total_payable_is_principal_plus_interest() {
        let p = reference_loan();
        let emi = compute_installment(p.principal, p.annual_rate_pct, p.tenure_years);
        let summary = build_amortization_summary(p.principal, p.annual_rate_pct, emi, p.tenure_years);
        assert_eq!(summary.total_payable, p.principal + summary.total_interest);
        assert!((summary.total_interest - dec!(2_335_723)).abs() < dec!(1));
    }

    #[test]
    fn test_overpaying_installment_is_clamped() {
        // Installment far above the balance: loan clears in period 1
        let summary = build_amortization_summary(dec!(1_000), dec!(12), dec!(5_000), 1);
        let first = &summary.periods[0];
        assert_eq!(first.period, 3);
        assert_eq!(first.remaining_balance, Decimal::ZERO);
        assert_eq!(first.principal_component, Decimal::ZERO);
        assert_eq!(first.interest_component, dec!(5_000));
    }

    #[test]
    fn test_degenerate_inputs_yield_empty_summary() {
        let zero_tenure = build_amortization_summary(dec!(10_000), dec!(10), dec!(100), 0);
        assert!(zero_tenure.is_empty());
        assert_eq!(zero_tenure.total_interest, Decimal::ZERO);
        assert_eq!(zero_tenure.total_payable, Decimal::ZERO);

        let zero_emi = build_amortization_summary(dec!(10_000), dec!(10), Decimal::ZERO, 5);
        assert!(zero_emi.is_empty());
        assert_eq!(zero_emi.total_payable, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let emi = compute_installment(dec!(100_000), Decimal::ZERO, 3);
        let summary = build_amortization_summary(dec!(100_000), Decimal::ZERO, emi, 3);
        assert!(summary.total_interest.abs() < dec!(0.000001));
        assert_eq!(summary.final_balance(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_loan_cost_envelope() {
        let out = calculate_loan_cost(&reference_loan()).unwrap();
        assert_eq!(out.result.num_periods, 180);
        assert_eq!(out.result.schedule.len(), 60);
        assert!((out.result.emi - dec!(26_865)).abs() < dec!(1));
        assert!((out.result.total_payable - dec!(4_835_723)).abs() < dec!(1));
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_loan_cost_warns_outside_typical_range() {
        let input = LoanParameters {
            principal: dec!(50_000),
            annual_rate_pct: dec!(30),
            tenure_years: 2,
        };
        let out = calculate_loan_cost(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_loan_cost_rejects_non_positive_principal() {
        let input = LoanParameters {
            principal: Decimal::ZERO,
            annual_rate_pct: dec!(10),
            tenure_years: 5,
        };
        match calculate_loan_cost(&input).unwrap_err() {
            LoanEaseError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_walk_yields_empty_summary() {
        // balance * r leaves Decimal range in the first period
        let summary = build_amortization_summary(
            dec!(10_000_000_000_000_000_000_000_000),
            dec!(1_200_000),
            dec!(1),
            1,
        );
        assert!(summary.is_empty());
        assert_eq!(summary.total_payable, Decimal::ZERO);
    }

    #[test]
    fn test_loan_cost_rejects_repayment_beyond_decimal_range() {
        let input = LoanParameters {
            principal: dec!(1_000_000_000_000_000_000_000_000_000),
            annual_rate_pct: dec!(1_000_000),
            tenure_years: 1,
        };
        match calculate_loan_cost(&input).unwrap_err() {
            LoanEaseError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_loan_cost_warns_when_installment_does_not_amortize() {
        // (1 + r)^n overflows, so the EMI is the interest-only limit P * r
        let input = LoanParameters {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(1_200_000),
            tenure_years: 1,
        };
        let out = calculate_loan_cost(&input).unwrap();
        assert_eq!(out.result.emi, dec!(1_000_000_000));
        assert_eq!(
            out.result.schedule.last().map(|p| p.remaining_balance),
            Some(dec!(1_000_000))
        );
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Installment does not amortize")));
    }

    #[test]
    fn test_loan_cost_rejects_zero_tenure() {
        let input = LoanParameters {
            principal: dec!(100_000),
            annual_rate_pct: dec!(10),
            tenure_years: 0,
        };
        assert!(calculate_loan_cost(&input).is_err());
    }
}
