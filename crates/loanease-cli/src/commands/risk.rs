use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanease_core::risk::{assess_risk, RiskInput};

use crate::input;

/// Arguments for the financial risk score
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Existing monthly debt payments (EMIs, credit cards)
    #[arg(long, alias = "existing-debt")]
    pub existing_monthly_debt: Option<Decimal>,

    /// Credit score (300-900)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Monthly fixed expenses (rent, utilities)
    #[arg(long, default_value = "0")]
    pub fixed_expenses: Decimal,

    /// Collateral (property, gold, investments) is offered
    #[arg(long)]
    pub collateral: bool,
}

pub fn run_risk(args: RiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RiskInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RiskInput {
            annual_income: args
                .annual_income
                .ok_or("--annual-income is required (or provide --input)")?,
            existing_monthly_debt: args
                .existing_monthly_debt
                .ok_or("--existing-monthly-debt is required (or provide --input)")?,
            credit_score: args
                .credit_score
                .ok_or("--credit-score is required (or provide --input)")?,
            fixed_expenses: args.fixed_expenses,
            has_collateral: args.collateral,
            weights: None,
        }
    };

    let result = assess_risk(&request)?;
    Ok(serde_json::to_value(result)?)
}
