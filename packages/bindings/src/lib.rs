use napi::Result as NapiResult;
use napi_derive::napi;

use loanease_core::amortization::calculate_loan_cost;
use loanease_core::attribution::model::{
    predict_approval as run_prediction, ApprovalFeatures, ApprovalModel, BucketedHeuristic,
    LogisticApprovalModel,
};
use loanease_core::attribution::{simulate_attribution, AttributionInput};
use loanease_core::eligibility::{assess_eligibility, EligibilityInput};
use loanease_core::risk::{assess_risk as run_risk, RiskInput};
use loanease_core::LoanParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan cost
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_cost(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculate_loan_cost(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Eligibility and risk
// ---------------------------------------------------------------------------

#[napi]
pub fn check_eligibility(input_json: String) -> NapiResult<String> {
    let input: EligibilityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = assess_eligibility(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Default applicant used to pre-fill the eligibility form.
#[napi]
pub fn eligibility_defaults() -> NapiResult<String> {
    serde_json::to_string(&EligibilityInput::default()).map_err(to_napi_error)
}

#[napi]
pub fn assess_risk(input_json: String) -> NapiResult<String> {
    let input: RiskInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_risk(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Approval explanation
// ---------------------------------------------------------------------------

#[napi]
pub fn explain_decision(input_json: String) -> NapiResult<String> {
    let input: AttributionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simulate_attribution(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Predict approval probability. Without `model_json` the bucketed
/// heuristic is used.
#[napi]
pub fn predict_approval(input_json: String, model_json: Option<String>) -> NapiResult<String> {
    let features: ApprovalFeatures = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let model: Box<dyn ApprovalModel> = match model_json {
        Some(raw) => Box::new(LogisticApprovalModel::from_json(&raw).map_err(to_napi_error)?),
        None => Box::new(BucketedHeuristic),
    };
    let output = run_prediction(model.as_ref(), &features).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
