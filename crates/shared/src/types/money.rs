//! Money helpers over fixed-point decimals.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every value that crosses a persistence or wire boundary is quantized
//! to exactly [`FRACTIONAL_DIGITS`] fractional digits, rounding half away
//! from zero. Parsing never fails: malformed or non-finite input becomes
//! zero, matching the lenient wire behavior the frontend relies on.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Canonical number of fractional digits for stored balances and amounts.
pub const FRACTIONAL_DIGITS: u32 = 2;

/// Balance credited to every account at signup.
#[must_use]
pub fn starting_balance() -> Decimal {
    Decimal::new(50_000, FRACTIONAL_DIGITS)
}

/// Rounds a value to the canonical precision, half away from zero.
#[must_use]
pub fn quantize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FRACTIONAL_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders a value as a display string with exactly two fractional digits.
#[must_use]
pub fn display(value: Decimal) -> String {
    format!("{:.2}", quantize(value))
}

/// Renders an optional stored value, treating absence as zero.
#[must_use]
pub fn display_opt(value: Option<Decimal>) -> String {
    value.map_or_else(|| "0.00".to_string(), display)
}

/// Parses a display string into a quantized decimal.
///
/// Returns zero if parsing fails; this function never errors.
#[must_use]
pub fn parse(s: &str) -> Decimal {
    s.trim().parse::<Decimal>().map_or(Decimal::ZERO, quantize)
}

/// Converts a wire number (JSON `number`) into a quantized decimal.
///
/// Non-finite input is treated as zero.
#[must_use]
pub fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).map_or(Decimal::ZERO, quantize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_starting_balance() {
        assert_eq!(starting_balance(), dec!(500.00));
        assert_eq!(display(starting_balance()), "500.00");
    }

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        assert_eq!(quantize(dec!(1.005)), dec!(1.01));
        assert_eq!(quantize(dec!(-1.005)), dec!(-1.01));
        assert_eq!(quantize(dec!(2.674999)), dec!(2.67));
        assert_eq!(quantize(dec!(30)), dec!(30.00));
    }

    #[test]
    fn test_display_pads_to_two_digits() {
        assert_eq!(display(dec!(70)), "70.00");
        assert_eq!(display(dec!(0.5)), "0.50");
        assert_eq!(display(dec!(125.5)), "125.50");
    }

    #[test]
    fn test_display_opt_absent_is_zero() {
        assert_eq!(display_opt(None), "0.00");
        assert_eq!(display_opt(Some(dec!(10.1))), "10.10");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse("30.00"), dec!(30.00));
        assert_eq!(parse("  12.345 "), dec!(12.35));
        assert_eq!(parse("not-a-number"), Decimal::ZERO);
        assert_eq!(parse(""), Decimal::ZERO);
    }

    #[test]
    fn test_from_f64_non_finite_is_zero() {
        assert_eq!(from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(from_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(from_f64(f64::NEG_INFINITY), Decimal::ZERO);
        assert_eq!(from_f64(25.5), dec!(25.50));
    }

    proptest! {
        /// Quantization is stable under repeated round-trips.
        #[test]
        fn prop_quantize_idempotent(cents in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..6) {
            let value = Decimal::new(cents, scale);
            let once = quantize(value);
            prop_assert_eq!(once, quantize(once));
            prop_assert_eq!(once, parse(&display(value)));
        }

        /// Quantized values carry at most two fractional digits.
        #[test]
        fn prop_quantize_scale(cents in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..8) {
            let value = Decimal::new(cents, scale);
            prop_assert!(quantize(value).scale() <= FRACTIONAL_DIGITS);
        }
    }
}
