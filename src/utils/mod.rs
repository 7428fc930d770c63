//! Utility functions for formatting and common operations
//!
//! This module provides centralized formatting utilities for consistent
//! display of currency amounts and holding durations throughout the
//! application.

use rust_decimal::Decimal;

/// Core amount formatting with full control over output.
///
/// Formats a Decimal with a thousands separator (`,`), two decimal places,
/// and an optional currency symbol prefix.
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `width` - Minimum width for padding (0 for no padding, right-aligned)
/// * `symbol` - Currency symbol prefix ("" for plain numbers)
///
/// # Examples
/// ```
/// use upkeep::utils::format_amount_with_width;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount_with_width(dec!(1234.56), 0, "¥"), "¥1,234.56");
/// assert_eq!(format_amount_with_width(dec!(1234), 12, ""), "    1,234.00");
/// ```
pub fn format_amount_with_width(value: Decimal, width: usize, symbol: &str) -> String {
    let is_negative = value < Decimal::ZERO;
    let abs_value = value.abs();

    // Round to 2 decimal places and format
    let formatted = format!("{:.2}", abs_value);
    let parts: Vec<&str> = formatted.split('.').collect();

    let integer_part = parts[0];
    let decimal_part = parts.get(1).unwrap_or(&"00");

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let result = format!("{}{}{}.{}", symbol, sign, with_separators, decimal_part);

    // Apply width padding (right-align)
    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Format with the given currency symbol: "¥1,234.56"
///
/// # Examples
/// ```
/// use upkeep::utils::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(1234.56), "¥"), "¥1,234.56");
/// assert_eq!(format_amount(dec!(-500), "$"), "$-500.00");
/// ```
pub fn format_amount(value: Decimal, symbol: &str) -> String {
    format_amount_with_width(value, 0, symbol)
}

/// Humanize a holding duration in days.
///
/// Uses the display convention of 30-day months and 365-day years, which is
/// what people expect from a "how long have I had this" label.
///
/// # Examples
/// ```
/// use upkeep::utils::format_days;
///
/// assert_eq!(format_days(12), "12 days");
/// assert_eq!(format_days(65), "2 mo 5 d");
/// assert_eq!(format_days(730), "2 yr");
/// ```
pub fn format_days(days: i64) -> String {
    if days < 30 {
        let unit = if days == 1 { "day" } else { "days" };
        return format!("{} {}", days, unit);
    }
    if days < 365 {
        let months = days / 30;
        let remaining = days % 30;
        return if remaining > 0 {
            format!("{} mo {} d", months, remaining)
        } else {
            format!("{} mo", months)
        };
    }
    let years = days / 365;
    let remaining = days % 365;
    if remaining == 0 {
        return format!("{} yr", years);
    }
    let months = remaining / 30;
    if months > 0 {
        format!("{} yr {} mo", years, months)
    } else {
        format!("{} yr {} d", years, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount_basic() {
        assert_eq!(format_amount(dec!(1234.56), "¥"), "¥1,234.56");
        assert_eq!(format_amount(dec!(0.99), "¥"), "¥0.99");
        assert_eq!(format_amount(dec!(1000000), "¥"), "¥1,000,000.00");
    }

    #[test]
    fn test_format_amount_small_values() {
        assert_eq!(format_amount(dec!(0), "¥"), "¥0.00");
        assert_eq!(format_amount(dec!(0.01), "¥"), "¥0.01");
        assert_eq!(format_amount(dec!(1), "¥"), "¥1.00");
        assert_eq!(format_amount(dec!(999.99), "¥"), "¥999.99");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec!(-1234.56), "¥"), "¥-1,234.56");
        assert_eq!(format_amount(dec!(-0.01), "$"), "$-0.01");
    }

    #[test]
    fn test_format_amount_no_symbol() {
        assert_eq!(format_amount(dec!(1234.56), ""), "1,234.56");
        assert_eq!(format_amount(dec!(-500), ""), "-500.00");
    }

    #[test]
    fn test_format_with_width() {
        let result = format_amount_with_width(dec!(100), 15, "¥");
        assert_eq!(result.len(), 15);
        assert_eq!(result, "        ¥100.00");

        // If result is already >= width, no padding added
        let result = format_amount_with_width(dec!(1000000), 5, "¥");
        assert_eq!(result, "¥1,000,000.00");
    }

    #[test]
    fn test_format_days_buckets() {
        assert_eq!(format_days(1), "1 day");
        assert_eq!(format_days(29), "29 days");
        assert_eq!(format_days(30), "1 mo");
        assert_eq!(format_days(65), "2 mo 5 d");
        assert_eq!(format_days(364), "12 mo 4 d");
        assert_eq!(format_days(365), "1 yr");
        assert_eq!(format_days(400), "1 yr 1 mo");
        assert_eq!(format_days(370), "1 yr 5 d");
        assert_eq!(format_days(730), "2 yr");
    }
}
