//! Display strings for the presentation surface

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places with thousands separators, e.g. `4,500,000.00`
pub fn format_amount(value: f64) -> String {
    let fixed = match Decimal::from_f64(value) {
        Some(d) => {
            let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        // Out of Decimal range, or not finite
        None => format!("{:.2}", value),
    };

    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return fixed;
    }

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Currency amount, e.g. `₹ 4,500,000.00`
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{} {}", symbol, format_amount(value))
}

/// Carpet efficiency with one decimal, e.g. `83.3% Carpet`
pub fn format_efficiency(pct: f64) -> String {
    format!("{:.1}% Carpet", pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(4_500_000.0), "4,500,000.00");
        assert_eq!(format_amount(3000.0), "3,000.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_amount(f64::NAN), "NaN");
        assert_eq!(format_amount(f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency("₹", 4_500_000.0), "₹ 4,500,000.00");
    }

    #[test]
    fn test_format_efficiency() {
        assert_eq!(format_efficiency(100.0 * 1500.0 / 1800.0), "83.3% Carpet");
        assert_eq!(format_efficiency(100.0), "100.0% Carpet");
    }
}
