//! Threshold tables for the simulated attribution.
//!
//! Each feature owns an ordered list of buckets. The first bucket whose bound
//! matches the measured value supplies the contribution (in probability
//! units, 0.20 = +20 pp) and a description template. `{value}` in a template
//! is replaced by the rendered measurement.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::{one_dp, rupees};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    CreditScore,
    DebtToIncome,
    MonthlyIncome,
}

impl Feature {
    /// All features in presentation order.
    pub const ALL: [Feature; 3] = [
        Feature::CreditScore,
        Feature::DebtToIncome,
        Feature::MonthlyIncome,
    ];

    pub fn rules(&self) -> &'static [BucketRule] {
        match self {
            Feature::CreditScore => CREDIT_SCORE_RULES,
            Feature::DebtToIncome => DTI_RULES,
            Feature::MonthlyIncome => INCOME_RULES,
        }
    }

    /// Display label; the credit score label carries the score itself.
    pub fn label(&self, measured: Decimal) -> String {
        match self {
            Feature::CreditScore => format!("Credit Score ({})", measured.trunc()),
            Feature::DebtToIncome => "Debt-to-Income (DTI)".to_string(),
            Feature::MonthlyIncome => "Monthly Income".to_string(),
        }
    }

    fn render(&self, measured: Decimal) -> String {
        match self {
            Feature::CreditScore => measured.trunc().to_string(),
            Feature::DebtToIncome => one_dp(measured),
            Feature::MonthlyIncome => rupees(measured),
        }
    }

    /// First bucket matching `measured`.
    pub fn bucket(&self, measured: Decimal) -> Option<&'static BucketRule> {
        self.rules().iter().find(|rule| rule.bound.matches(measured))
    }

    pub fn describe(&self, rule: &BucketRule, measured: Decimal) -> String {
        rule.template.replace("{value}", &self.render(measured))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(Decimal),
    AtMost(Decimal),
    Otherwise,
}

impl Bound {
    pub fn matches(&self, measured: Decimal) -> bool {
        match *self {
            Bound::AtLeast(min) => measured >= min,
            Bound::AtMost(max) => measured <= max,
            Bound::Otherwise => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketRule {
    pub bound: Bound,
    pub value: Decimal,
    pub template: &'static str,
}

pub const CREDIT_SCORE_RULES: &[BucketRule] = &[
    BucketRule {
        bound: Bound::AtLeast(dec!(750)),
        value: dec!(0.20),
        template: "Excellent score, significantly boosting approval probability.",
    },
    BucketRule {
        bound: Bound::AtLeast(dec!(650)),
        value: dec!(0.05),
        template: "Good score, slight positive impact.",
    },
    BucketRule {
        bound: Bound::Otherwise,
        value: dec!(-0.15),
        template: "Low score, significantly lowering approval probability.",
    },
];

pub const DTI_RULES: &[BucketRule] = &[
    BucketRule {
        bound: Bound::AtMost(dec!(30)),
        value: dec!(0.15),
        template: "Low DTI ({value}%), strong factor for approval (manageable debt).",
    },
    BucketRule {
        bound: Bound::AtMost(dec!(45)),
        value: dec!(-0.05),
        template: "Moderate DTI ({value}%), slight negative impact.",
    },
    BucketRule {
        bound: Bound::Otherwise,
        value: dec!(-0.25),
        template: "High DTI ({value}%), major factor against approval (high risk of default).",
    },
];

pub const INCOME_RULES: &[BucketRule] = &[
    BucketRule {
        bound: Bound::AtLeast(dec!(100_000)),
        value: dec!(0.10),
        template: "High income ({value}/mo) provides strong repayment capacity.",
    },
    BucketRule {
        bound: Bound::AtLeast(dec!(50_000)),
        value: dec!(0.03),
        template: "Moderate income ({value}/mo), slight positive support.",
    },
    BucketRule {
        bound: Bound::Otherwise,
        value: dec!(-0.05),
        template: "Lower income ({value}/mo) is a mild risk factor.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_ends_with_catch_all() {
        for feature in Feature::ALL {
            let last = feature.rules().last().map(|r| r.bound);
            assert_eq!(last, Some(Bound::Otherwise), "{feature:?}");
        }
    }

    #[test]
    fn test_credit_buckets() {
        let pick = |s| Feature::CreditScore.bucket(Decimal::from(s)).map(|r| r.value);
        assert_eq!(pick(750), Some(dec!(0.20)));
        assert_eq!(pick(749), Some(dec!(0.05)));
        assert_eq!(pick(650), Some(dec!(0.05)));
        assert_eq!(pick(649), Some(dec!(-0.15)));
    }

    #[test]
    fn test_dti_buckets_inclusive_upper_bounds() {
        let pick = |d| Feature::DebtToIncome.bucket(d).map(|r| r.value);
        assert_eq!(pick(dec!(30)), Some(dec!(0.15)));
        assert_eq!(pick(dec!(30.01)), Some(dec!(-0.05)));
        assert_eq!(pick(dec!(45)), Some(dec!(-0.05)));
        assert_eq!(pick(dec!(45.01)), Some(dec!(-0.25)));
    }

    #[test]
    fn test_income_buckets() {
        let pick = |i| Feature::MonthlyIncome.bucket(i).map(|r| r.value);
        assert_eq!(pick(dec!(100_000)), Some(dec!(0.10)));
        assert_eq!(pick(dec!(50_000)), Some(dec!(0.03)));
        assert_eq!(pick(dec!(49_999)), Some(dec!(-0.05)));
    }

    #[test]
    fn test_descriptions_render_measurement() {
        let dti = dec!(35.81);
        let rule = Feature::DebtToIncome.bucket(dti).unwrap();
        assert_eq!(
            Feature::DebtToIncome.describe(rule, dti),
            "Moderate DTI (35.8%), slight negative impact."
        );

        let income = dec!(75_000);
        let rule = Feature::MonthlyIncome.bucket(income).unwrap();
        assert_eq!(
            Feature::MonthlyIncome.describe(rule, income),
            "Moderate income (₹75,000/mo), slight positive support."
        );
        assert_eq!(Feature::CreditScore.label(dec!(780)), "Credit Score (780)");
    }
}
