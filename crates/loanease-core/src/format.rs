//! Text renderings of numbers used inside verdict messages and
//! contribution descriptions.

use rust_decimal::Decimal;

/// Round to one decimal place and always show it (`26.9`, `40.0`).
pub fn one_dp(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}

/// Whole-rupee amount grouped in threes (`₹125,000`).
pub fn rupees(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}
