use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Render a number the way the dashboard tables do: two decimals and `,`
/// thousands separators (en-US). Non-finite input renders as `N/A`.
///
/// Rounding goes through `Decimal` (midpoint away from zero). Magnitudes beyond
/// its range fall back to `f64` formatting.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let text = match Decimal::from_f64(value) {
        Some(decimal) => format!(
            "{:.2}",
            decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", value),
    };

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" prints without the sign.
    let sign = if negative && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn format_usd(value: f64) -> String {
    format!("${}", format_amount(value))
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-1234.5), "-1,234.50");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(f64::NAN), "N/A");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(format_amount(1.005e3), "1,005.00");
        assert_eq!(format_amount(0.125), "0.13");
    }

    #[test]
    fn test_values_beyond_decimal_range_still_format() {
        let large = format_amount(1e30);
        assert!(large.starts_with("1,000,000,000,000,000,0"), "{}", large);
        assert!(large.ends_with(".00"));
        assert_eq!(large.matches(',').count(), 10);

        assert!(format_amount(-1e30).starts_with("-1,000,000"));
        assert_eq!(format_amount(f64::INFINITY), "N/A");
    }

    #[test]
    fn test_usd_and_percent() {
        assert_eq!(format_usd(12500000.0), "$12,500,000.00");
        assert_eq!(format_percent(0.3), "0.30%");
    }
}
