use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanease_core::eligibility::{assess_eligibility, EligibilityInput};

use crate::input;

/// Arguments for the loan eligibility check
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Desired loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Loan tenure in years
    #[arg(long, alias = "tenure")]
    pub tenure_years: Option<u32>,

    /// Monthly income
    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// Credit score (300-900)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// EMIs already being paid each month
    #[arg(long)]
    pub existing_emis: Option<Decimal>,

    /// Maximum DTI in percent [default: 40]
    #[arg(long)]
    pub max_dti: Option<Decimal>,

    /// Minimum credit score [default: 650]
    #[arg(long)]
    pub min_credit_score: Option<u32>,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        EligibilityInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            credit_score: args
                .credit_score
                .ok_or("--credit-score is required (or provide --input)")?,
            existing_emis: args.existing_emis,
            policy: None,
        }
    };

    if args.max_dti.is_some() || args.min_credit_score.is_some() {
        let mut policy = request.policy.take().unwrap_or_default();
        if let Some(max_dti) = args.max_dti {
            policy.max_dti_pct = max_dti;
        }
        if let Some(min_score) = args.min_credit_score {
            policy.min_credit_score = min_score;
        }
        request.policy = Some(policy);
    }

    tracing::debug!(policy = ?request.policy, "running eligibility check");

    let result = assess_eligibility(&request)?;
    Ok(serde_json::to_value(result)?)
}
