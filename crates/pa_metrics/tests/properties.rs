//! Property tests over the monetary parser and the display formatter.
//!
//! The parser must be total over arbitrary strings, and well-formed `M`/`K`
//! currency strings must round-trip through parse → format at the same
//! suffix magnitude.

use pa_core::format::format_currency;
use pa_core::percent::normalize_percent;
use pa_extract::money::parse_amount;
use proptest::prelude::*;

proptest! {
    /// Totality: no input panics, and digit-derived results are never NaN
    /// or negative.
    #[test]
    fn parse_amount_is_total(s in "\\PC*") {
        let v = parse_amount(&s);
        prop_assert!(!v.is_nan());
        prop_assert!(v >= 0.0);
    }

    /// `$X.YZM` round-trips: parse then format yields the same string.
    #[test]
    fn million_strings_round_trip(cents in 100u64..99_999u64) {
        // 1.00M ..= 999.99M in exact hundredths
        let text = format!("${}.{:02}M", cents / 100, cents % 100);
        let parsed = parse_amount(&text);
        // numeric value within float wobble of the exact hundredth
        prop_assert!((parsed - (cents as f64) * 10_000.0).abs() < 1.0);
        prop_assert_eq!(format_currency(parsed), text);
    }

    /// `$NK` round-trips for the 0-decimal K band (≥ $10K).
    #[test]
    fn thousand_strings_round_trip(k in 10u64..=999u64) {
        let text = format!("${k}K");
        let parsed = parse_amount(&text);
        prop_assert_eq!(parsed, (k as f64) * 1_000.0);
        prop_assert_eq!(format_currency(parsed), text);
    }

    /// Percent normalization always lands on integer points, with the
    /// fraction rule applying at and below one.
    #[test]
    fn percent_normalization_respects_the_fraction_boundary(x in 0.0f64..=100.0f64) {
        let points = normalize_percent(x);
        if x <= 1.0 {
            prop_assert_eq!(points, (x * 100.0).round() as i64);
        } else {
            prop_assert_eq!(points, x.round() as i64);
        }
    }
}
