use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanease_core::attribution::model::{
    predict_approval, ApprovalFeatures, ApprovalModel, BucketedHeuristic, LogisticApprovalModel,
};
use loanease_core::attribution::{simulate_attribution, AttributionInput, Contribution};
use loanease_core::eligibility::EligibilityInput;

use crate::input;

/// Applicant fields shared by `explain` and `predict`. Any flag given here
/// overrides the pre-filled value.
#[derive(Args)]
pub struct ApplicantArgs {
    /// JSON file holding the last eligibility check; pre-fills every field
    #[arg(long)]
    pub prefill: Option<String>,

    /// Credit score (300-900)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Monthly income
    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// Desired loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Loan tenure in years
    #[arg(long, alias = "tenure")]
    pub tenure_years: Option<u32>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,
}

impl ApplicantArgs {
    /// Start from the pre-fill file (or the reference applicant), then apply flags.
    fn resolve(&self) -> Result<AttributionInput, Box<dyn std::error::Error>> {
        let last_check: EligibilityInput = match self.prefill {
            Some(ref path) => input::file::read_json(path)?,
            None => EligibilityInput::default(),
        };
        let mut applicant = AttributionInput::from(&last_check);

        if let Some(v) = self.credit_score {
            applicant.credit_score = v;
        }
        if let Some(v) = self.monthly_income {
            applicant.monthly_income = v;
        }
        if let Some(v) = self.loan_amount {
            applicant.loan_amount = v;
        }
        if let Some(v) = self.tenure_years {
            applicant.tenure_years = v;
        }
        if let Some(v) = self.annual_rate_pct {
            applicant.annual_rate_pct = v;
        }
        Ok(applicant)
    }
}

/// Arguments for the decision explanation
#[derive(Args)]
pub struct ExplainArgs {
    /// Path to JSON input file (overrides all other flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}

/// Arguments for approval probability prediction
#[derive(Args)]
pub struct PredictArgs {
    /// Path to JSON features file (overrides applicant flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Persisted logistic model (JSON); defaults to the bucketed heuristic
    #[arg(long)]
    pub model: Option<String>,

    /// Extra model feature as NAME=VALUE (repeatable), e.g. --feature Age=41
    #[arg(long = "feature", value_parser = parse_feature)]
    pub features: Vec<(String, Decimal)>,

    #[command(flatten)]
    pub applicant: ApplicantArgs,
}

pub fn run_explain(args: ExplainArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AttributionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.applicant.resolve()?
    };

    explain(&request)
}

/// Attribution with contributions listed most negative first, the order the
/// explanation chart reads in.
fn explain(request: &AttributionInput) -> Result<Value, Box<dyn std::error::Error>> {
    let mut result = simulate_attribution(request)?;
    let ranked: Vec<Contribution> = result.result.ranked().into_iter().cloned().collect();
    result.result.contributions = ranked;
    Ok(serde_json::to_value(result)?)
}

pub fn run_predict(args: PredictArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut features: ApprovalFeatures = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ApprovalFeatures::new(args.applicant.resolve()?)
    };
    features.extra.extend(args.features);

    let model: Box<dyn ApprovalModel> = match args.model {
        Some(ref path) => {
            let raw = input::file::read_to_string(path)?;
            Box::new(LogisticApprovalModel::from_json(&raw)?)
        }
        None => Box::new(BucketedHeuristic),
    };

    let result = predict_approval(model.as_ref(), &features)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_feature(raw: &str) -> Result<(String, Decimal), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let value: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}
