use loanease_core::eligibility::{assess_eligibility, Decision, EligibilityInput};
use loanease_core::risk::{assess_risk, RiskBand, RiskInput};
use loanease_core::LoanEaseError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Eligibility
// ===========================================================================

#[test]
fn test_high_dti_with_good_credit_cites_dti_only() {
    // 75k income, EMI above 30k (DTI > 40%), credit 780
    let input = EligibilityInput {
        loan_amount: dec!(3_000_000),
        annual_rate_pct: dec!(10),
        tenure_years: 15,
        monthly_income: dec!(75_000),
        credit_score: 780,
        existing_emis: None,
        policy: None,
    };
    let out = assess_eligibility(&input).unwrap();
    let v = &out.result;
    assert!(v.emi > dec!(30_000));
    assert!(v.dti_ratio_pct > dec!(40));
    assert_eq!(v.decision, Decision::NotEligible);
    assert_eq!(v.reasons.len(), 1);
    assert!(v.reasons[0].contains("DTI"));
    assert!(!v.message.contains("Credit Score"));
}

#[test]
fn test_raising_credit_score_never_downgrades_eligible() {
    let mut previous: Option<Decision> = None;
    for score in (650..=900).step_by(10) {
        let input = EligibilityInput {
            credit_score: score,
            ..EligibilityInput::default()
        };
        let decision = assess_eligibility(&input).unwrap().result.decision;
        if previous == Some(Decision::Eligible) {
            assert_eq!(decision, Decision::Eligible, "score {score}");
        }
        previous = Some(decision);
    }
}

#[test]
fn test_eligibility_is_deterministic() {
    let input = EligibilityInput::default();
    let a = assess_eligibility(&input).unwrap().result;
    let b = assess_eligibility(&input).unwrap().result;
    assert_eq!(a.dti_ratio_pct, b.dti_ratio_pct);
    assert_eq!(a.message, b.message);
}

#[test]
fn test_eligibility_input_from_json_defaults_optional_fields() {
    let json = r#"{
        "loan_amount": "2500000",
        "annual_rate_pct": 10.0,
        "tenure_years": 15,
        "monthly_income": 75000,
        "credit_score": 780
    }"#;
    let input: EligibilityInput = serde_json::from_str(json).unwrap();
    assert!(input.existing_emis.is_none());
    let out = assess_eligibility(&input).unwrap();
    assert_eq!(out.result.decision, Decision::Eligible);
}

#[test]
fn test_eligibility_rejects_zero_loan() {
    let input = EligibilityInput {
        loan_amount: Decimal::ZERO,
        ..EligibilityInput::default()
    };
    let err = assess_eligibility(&input).unwrap_err();
    assert!(matches!(err, LoanEaseError::InvalidInput { .. }));
    assert!(err.to_string().starts_with("Invalid input: loan_amount"));
}

// ===========================================================================
// Risk
// ===========================================================================

#[test]
fn test_risk_worked_example() {
    let input = RiskInput {
        annual_income: dec!(600_000),
        existing_monthly_debt: dec!(30_000),
        credit_score: 750,
        fixed_expenses: dec!(15_000),
        has_collateral: false,
        weights: None,
    };
    let out = assess_risk(&input).unwrap();
    assert_eq!(out.result.risk_score, dec!(33));
    assert_eq!(out.result.band, RiskBand::Moderate);
    assert_eq!(
        out.result.interpretation,
        "Good standing. Your obligations are manageable."
    );
}

#[test]
fn test_risk_score_always_in_range() {
    for debt in [0, 10_000, 50_000, 200_000, 500_000] {
        for score in [300u32, 600, 900] {
            for collateral in [false, true] {
                let input = RiskInput {
                    annual_income: dec!(240_000),
                    existing_monthly_debt: Decimal::from(debt),
                    credit_score: score,
                    fixed_expenses: dec!(5_000),
                    has_collateral: collateral,
                    weights: None,
                };
                let s = assess_risk(&input).unwrap().result.risk_score;
                assert!(s >= Decimal::ZERO && s <= dec!(100));
            }
        }
    }
}

#[test]
fn test_risk_input_collateral_defaults_to_false() {
    let json = r#"{
        "annual_income": 600000,
        "existing_monthly_debt": 30000,
        "credit_score": 750,
        "fixed_expenses": 15000
    }"#;
    let input: RiskInput = serde_json::from_str(json).unwrap();
    assert!(!input.has_collateral);
    assert_eq!(assess_risk(&input).unwrap().result.collateral_reduction, Decimal::ZERO);
}
