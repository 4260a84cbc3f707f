//! INR amount formatting.
//!
//! Prices across the platform are rupee amounts held in
//! [`rust_decimal::Decimal`]. Display formatting uses the Indian digit
//! grouping convention: the last three integer digits form one group,
//! everything before that is grouped in pairs (12,34,567).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Format a rupee amount with Indian digit grouping.
///
/// Whole amounts render without a fractional part; anything else is rounded
/// to two decimal places (paise).
///
/// ```
/// use mangaiyar_core::format_inr;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_inr(Decimal::from(100)), "100");
/// assert_eq!(format_inr(Decimal::from(1_234_567)), "12,34,567");
/// assert_eq!(format_inr(Decimal::new(123450, 2)), "1,234.50");
/// ```
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let integer = abs.trunc();
    let fraction = abs.fract();

    let digits = integer.to_u128().map_or_else(
        // Out of u128 range is unreachable for real prices; fall back to the
        // plain decimal rendering.
        || integer.to_string(),
        |v| v.to_string(),
    );

    let grouped = group_indian(&digits);

    let sign = if negative { "-" } else { "" };
    if fraction.is_zero() {
        format!("{sign}{grouped}")
    } else {
        // fract() keeps the scale, e.g. 0.50 for 1234.50
        let paise = (fraction * Decimal::from(100)).round();
        format!("{sign}{grouped}.{:02}", paise.to_u32().unwrap_or(0))
    }
}

/// Group an ASCII digit string Indian-style: last 3 digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();

    let bytes = head.as_bytes();
    let mut end = bytes.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts_ungrouped() {
        assert_eq!(format_inr(Decimal::from(0)), "0");
        assert_eq!(format_inr(Decimal::from(7)), "7");
        assert_eq!(format_inr(Decimal::from(999)), "999");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_inr(Decimal::from(1_000)), "1,000");
        assert_eq!(format_inr(Decimal::from(12_345)), "12,345");
        assert_eq!(format_inr(Decimal::from(123_456)), "1,23,456");
        assert_eq!(format_inr(Decimal::from(1_234_567)), "12,34,567");
        assert_eq!(format_inr(Decimal::from(123_456_789)), "12,34,56,789");
    }

    #[test]
    fn test_fractional_amounts() {
        assert_eq!(format_inr(Decimal::new(4550, 2)), "45.50");
        assert_eq!(format_inr(Decimal::new(123_405, 2)), "1,234.05");
    }

    #[test]
    fn test_whole_amount_drops_fraction() {
        assert_eq!(format_inr(Decimal::new(10_000, 2)), "100");
    }

    #[test]
    fn test_rounds_to_paise() {
        assert_eq!(format_inr(Decimal::new(1006, 3)), "1.01");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_inr(Decimal::from(-1_234)), "-1,234");
    }
}
