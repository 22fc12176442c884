//! Approval-probability models.
//!
//! [`ApprovalModel`] is the seam between the interactive calculations and a
//! trained classifier. Two implementations ship:
//!
//! * [`BucketedHeuristic`] returns the simulated attribution's final
//!   probability and is the default.
//! * [`LogisticApprovalModel`] is a persisted logistic model with
//!   standard-scaler parameters, loaded from JSON.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use super::simulator::{simulate_attribution, AttributionInput, Outcome};
use crate::error::LoanEaseError;
use crate::types::*;
use crate::LoanEaseResult;

/// Logits are clamped to this magnitude before exponentiation.
const LOGIT_LIMIT: Decimal = dec!(40);

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Applicant inputs plus any additional named features a persisted model
/// was trained on (e.g. `Age`, `CCAvg`, `Education`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalFeatures {
    pub applicant: AttributionInput,
    #[serde(default)]
    pub extra: BTreeMap<String, Decimal>,
}

impl ApprovalFeatures {
    pub fn new(applicant: AttributionInput) -> Self {
        Self {
            applicant,
            extra: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: Decimal) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// Resolve a feature by name. Applicant fields take precedence.
    pub fn value(&self, name: &str) -> Option<Decimal> {
        let a = &self.applicant;
        match name {
            "credit_score" => Some(Decimal::from(a.credit_score)),
            "monthly_income" => Some(a.monthly_income),
            "loan_amount" => Some(a.loan_amount),
            "tenure_years" => Some(Decimal::from(a.tenure_years)),
            "annual_rate_pct" => Some(a.annual_rate_pct),
            other => self.extra.get(other).copied(),
        }
    }
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

pub trait ApprovalModel {
    fn name(&self) -> &str;

    /// Probability of approval in [0, 1].
    fn predict_approval(&self, features: &ApprovalFeatures) -> LoanEaseResult<Rate>;
}

/// The threshold-bucket simulation, exposed as a model.
#[derive(Debug, Clone, Default)]
pub struct BucketedHeuristic;

impl ApprovalModel for BucketedHeuristic {
    fn name(&self) -> &str {
        "bucketed_heuristic"
    }

    fn predict_approval(&self, features: &ApprovalFeatures) -> LoanEaseResult<Rate> {
        Ok(simulate_attribution(&features.applicant)?
            .result
            .final_probability)
    }
}

/// Logistic regression over standardised features:
/// `p = 1 / (1 + e^-(b + Σ w_i (x_i - μ_i) / σ_i))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticApprovalModel {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub features: Vec<String>,
    pub means: Vec<Decimal>,
    pub scales: Vec<Decimal>,
    pub coefficients: Vec<Decimal>,
    pub intercept: Decimal,
}

fn default_model_name() -> String {
    "logistic".to_string()
}

impl LogisticApprovalModel {
    pub fn from_json(json: &str) -> LoanEaseResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> LoanEaseResult<()> {
        let n = self.features.len();
        if n == 0 {
            return Err(LoanEaseError::ModelError("model has no features".into()));
        }
        if self.means.len() != n || self.scales.len() != n || self.coefficients.len() != n {
            return Err(LoanEaseError::ModelError(format!(
                "expected {n} means, scales and coefficients; got {}, {}, {}",
                self.means.len(),
                self.scales.len(),
                self.coefficients.len()
            )));
        }
        if let Some(i) = self.scales.iter().position(|s| s.is_zero()) {
            return Err(LoanEaseError::ModelError(format!(
                "scale for feature '{}' is zero",
                self.features[i]
            )));
        }
        Ok(())
    }

    /// Per-feature log-odds contributions `w_i * z_i`, in model feature order.
    pub fn contributions(&self, features: &ApprovalFeatures) -> LoanEaseResult<Vec<(String, Decimal)>> {
        self.validate()?;
        self.features
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let x = features.value(name).ok_or_else(|| {
                    LoanEaseError::invalid(name, "feature required by the model is missing")
                })?;
                let contribution = x
                    .checked_sub(self.means[i])
                    .and_then(|centered| centered.checked_div(self.scales[i]))
                    .and_then(|z| z.checked_mul(self.coefficients[i]))
                    .ok_or_else(|| overflow(name))?;
                Ok((name.clone(), contribution))
            })
            .collect()
    }
}

impl ApprovalModel for LogisticApprovalModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_approval(&self, features: &ApprovalFeatures) -> LoanEaseResult<Rate> {
        let logit = self
            .contributions(features)?
            .iter()
            .try_fold(self.intercept, |acc, (_, c)| acc.checked_add(*c))
            .ok_or_else(|| overflow("logit"))?;
        Ok(sigmoid(logit))
    }
}

fn overflow(name: &str) -> LoanEaseError {
    LoanEaseError::ModelError(format!("'{name}' leaves Decimal range"))
}

fn sigmoid(logit: Decimal) -> Decimal {
    let z = logit.max(-LOGIT_LIMIT).min(LOGIT_LIMIT);
    match (-z).checked_exp() {
        Some(e) => Decimal::ONE / (Decimal::ONE + e),
        None if z > Decimal::ZERO => Decimal::ONE,
        None => Decimal::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Prediction envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalPrediction {
    pub model: String,
    pub probability: Rate,
    pub outcome: Outcome,
}

pub fn predict_approval(
    model: &dyn ApprovalModel,
    features: &ApprovalFeatures,
) -> LoanEaseResult<ComputationOutput<ApprovalPrediction>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let probability = model.predict_approval(features)?;
    let outcome = if probability >= dec!(0.5) {
        Outcome::LikelyApproved
    } else {
        Outcome::LikelyRejected
    };

    debug!(model = model.name(), %probability, ?outcome, "approval predicted");

    let output = ApprovalPrediction {
        model: model.name().to_string(),
        probability,
        outcome,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({ "decision_threshold": "0.5" });

    Ok(with_metadata(
        "Approval probability from a pluggable model",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
