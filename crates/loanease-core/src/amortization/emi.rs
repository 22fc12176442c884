//! Equated monthly installment (EMI).
//!
//! EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), with `r` the monthly rate and
//! `n` the number of monthly periods. Zero periods, a zero rate and a
//! vanishing denominator fall back to straight-line repayment `P / n`.
//! An installment beyond Decimal range is reported by [`try_installment`]
//! and saturated by [`compute_installment`], never a panic.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::types::{Money, Percent, Rate};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate into a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(1200)
}

/// Number of monthly periods in `tenure_years`.
pub fn num_periods(tenure_years: u32) -> u32 {
    tenure_years.saturating_mul(MONTHS_PER_YEAR)
}

/// Monthly installment for a fully amortizing loan. Never negative.
///
/// Saturates at `Decimal::MAX` when the installment itself is beyond Decimal
/// range; use [`try_installment`] to detect that case.
pub fn compute_installment(principal: Money, annual_rate_pct: Percent, tenure_years: u32) -> Money {
    try_installment(principal, annual_rate_pct, tenure_years).unwrap_or_else(|| {
        debug!(%principal, %annual_rate_pct, tenure_years, "EMI exceeds decimal range; saturated");
        Decimal::MAX
    })
}

/// Checked installment. `None` only when the EMI cannot be represented.
pub fn try_installment(
    principal: Money,
    annual_rate_pct: Percent,
    tenure_years: u32,
) -> Option<Money> {
    let r = monthly_rate(annual_rate_pct);
    let n = num_periods(tenure_years);

    if n == 0 {
        return Some(Decimal::ZERO);
    }
    let linear = principal.checked_div(Decimal::from(n))?;
    if r.is_zero() {
        return Some(linear.max(Decimal::ZERO));
    }

    let emi = match annuity_ratio(r, n)? {
        Some(ratio) => principal.checked_mul(r)?.checked_mul(ratio)?,
        None => {
            debug!(%principal, %annual_rate_pct, tenure_years, "EMI fell back to linear repayment");
            linear
        }
    };

    Some(emi.max(Decimal::ZERO))
}

/// `(1 + r)^n / ((1 + r)^n - 1)`. The inner `None` means the denominator
/// vanished at Decimal precision; the outer `None` means overflow.
fn annuity_ratio(r: Rate, n: u32) -> Option<Option<Decimal>> {
    let base = Decimal::ONE.checked_add(r)?;
    let factor = match base.checked_powu(u64::from(n)) {
        Some(f) => f,
        // (1 + r)^n beyond Decimal range: the ratio tends to 1
        None => return Some(Some(Decimal::ONE)),
    };

    let denom = factor.checked_sub(Decimal::ONE)?;
    if denom.is_zero() {
        return Some(None);
    }
    factor.checked_div(denom).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_emi_reference_loan() {
        // 2.5M at 10% over 15 years: EMI ~ 26,865.13
        let emi = compute_installment(dec!(2_500_000), dec!(10), 15);
        assert!((emi - dec!(26_865.13)).abs() < dec!(0.01), "emi = {emi}");
    }

    #[test]
    fn test_emi_zero_rate_is_linear() {
        let emi = compute_installment(dec!(120_000), Decimal::ZERO, 1);
        assert_eq!(emi, dec!(10_000));
    }

    #[test]
    fn test_emi_zero_tenure_is_zero() {
        assert_eq!(compute_installment(dec!(100_000), dec!(10), 0), Decimal::ZERO);
        assert_eq!(compute_installment(dec!(100_000), Decimal::ZERO, 0), Decimal::ZERO);
    }

    #[test]
    fn test_emi_tiny_rate_falls_back_to_linear() {
        // (1 + r)^12 - 1 is far below Decimal precision
        let emi = compute_installment(dec!(1200), dec!(0.0000000000000000000000001), 1);
        assert!((emi - dec!(100)).abs() < dec!(0.000001), "emi = {emi}");
    }

    #[test]
    fn test_emi_huge_rate_approaches_interest_only() {
        // factor overflows; installment tends to P * r
        let emi = compute_installment(dec!(1_000_000), dec!(50_000), 30);
        let interest_only = dec!(1_000_000) * monthly_rate(dec!(50_000));
        assert!(emi >= interest_only * dec!(0.999_999));
    }

    #[test]
    fn test_emi_negative_principal_clamped() {
        assert_eq!(compute_installment(dec!(-10_000), dec!(10), 5), Decimal::ZERO);
    }

    #[test]
    fn test_emi_covers_principal() {
        for (p, rate, years) in [
            (dec!(100_000), dec!(1), 1u32),
            (dec!(500_000), dec!(7.5), 10),
            (dec!(4_000_000), dec!(20), 30),
        ] {
            let emi = compute_installment(p, rate, years);
            assert!(emi * Decimal::from(num_periods(years)) >= p);
        }
    }

    #[test]
    fn test_emi_beyond_decimal_range_is_detected() {
        // P * r overflows: no silent fallback to P / n
        let principal = dec!(10_000_000_000_000_000_000_000_000);
        assert_eq!(try_installment(principal, dec!(1_200_000), 1), None);
        assert_eq!(compute_installment(principal, dec!(1_200_000), 1), Decimal::MAX);
    }

    #[test]
    fn test_try_installment_matches_compute() {
        assert_eq!(
            try_installment(dec!(2_500_000), dec!(10), 15),
            Some(compute_installment(dec!(2_500_000), dec!(10), 15))
        );
        assert_eq!(try_installment(dec!(100_000), dec!(10), 0), Some(Decimal::ZERO));
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(num_periods(15), 180);
    }
}
