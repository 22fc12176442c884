use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios and probabilities expressed as decimals (0.40 = 40%).
pub type Rate = Decimal;

/// Values already scaled to percent (40 = 40%).
pub type Percent = Decimal;

/// Principal, annual rate and tenure of a single loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    /// Annual nominal rate in percent (10.5 = 10.5% p.a.).
    pub annual_rate_pct: Percent,
    pub tenure_years: u32,
}

impl LoanParameters {
    /// Number of monthly periods over the tenure.
    pub fn num_periods(&self) -> u32 {
        self.tenure_years.saturating_mul(12)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Push a warning when `value` falls outside the range a loan form would accept.
pub(crate) fn warn_outside_range(
    warnings: &mut Vec<String>,
    label: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) {
    if value < min || value > max {
        warnings.push(format!(
            "{label} {value} is outside the typical range {min} to {max}"
        ));
    }
}
