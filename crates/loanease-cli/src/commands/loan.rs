use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanease_core::amortization::calculate_loan_cost;
use loanease_core::LoanParameters;

use crate::input;

/// Arguments for the EMI / loan cost calculator
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Loan tenure in years
    #[arg(long, alias = "tenure")]
    pub tenure_years: Option<u32>,

    /// Print only the quarterly amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanParameters = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanParameters {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
        }
    };

    let result = calculate_loan_cost(&loan)?;
    if args.schedule {
        return Ok(serde_json::to_value(&result.result.schedule)?);
    }
    Ok(serde_json::to_value(result)?)
}
