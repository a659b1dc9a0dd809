//! Display helpers for yen amounts and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{round_half_up, Money, Percent};

/// `¥` followed by the thousands-grouped integer amount, e.g. `¥1,234,567`.
/// Negative amounts render as `-¥1,234`.
pub fn format_yen(amount: Money) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}¥{}", group_thousands(&rounded.abs().trunc().to_string()))
}

/// One decimal place and a percent sign, e.g. `12.3%`.
pub fn format_percent(value: Percent) -> String {
    format!("{}%", one_decimal(value))
}

/// Like [`format_percent`] but with an explicit `+` on positive values, for
/// deltas and margins.
pub fn format_signed_percent(value: Percent) -> String {
    let rounded = one_decimal(value);
    if rounded > Decimal::ZERO {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

fn one_decimal(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of -0.0
        rounded = Decimal::ZERO;
    }
    rounded.rescale(1);
    rounded
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
