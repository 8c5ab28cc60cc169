//! crates/pa_core/src/percent.rs
//! Normalization for percent-like inputs that arrive either as a 0–1 fraction
//! or as already-integer points.
//!
//! Upstream payloads are inconsistent about whether a raw `1` means "1%" or
//! "100% expressed as a fraction" (heir allocations vs. some risk-probability
//! fields disagree). This module codifies the dominant convention once:
//! `x <= 1` is a fraction. That makes the boundary explicit — `100%` must be
//! supplied as `1`, and a literal one percent must arrive as a point value in
//! a payload that otherwise uses points.

/// Normalize a percent-like raw value to integer points.
///
/// - `x <= 1` (including exactly `1`) → treated as a fraction, `round(x * 100)`
/// - `x > 1` → already points, rounded to the nearest integer
/// - non-finite → 0
pub fn normalize_percent(x: f64) -> i64 {
    if !x.is_finite() {
        return 0;
    }
    if x <= 1.0 {
        (x * 100.0).round() as i64
    } else {
        x.round() as i64
    }
}

/// Normalize an allocation share to the 0–100 range.
///
/// Same fraction rule as [`normalize_percent`], then clamped: allocations are
/// shares of an estate and can never leave 0–100.
pub fn normalize_allocation_pct(x: f64) -> u8 {
    normalize_percent(x).clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_below_one_scales() {
        assert_eq!(normalize_percent(0.4), 40);
        assert_eq!(normalize_percent(0.125), 13); // round half away from zero
        assert_eq!(normalize_percent(0.0), 0);
    }

    #[test]
    fn exactly_one_is_a_fraction() {
        // Explicit boundary: 1 means 100%, not 1%.
        assert_eq!(normalize_percent(1.0), 100);
    }

    #[test]
    fn points_above_one_pass_through() {
        assert_eq!(normalize_percent(60.0), 60);
        assert_eq!(normalize_percent(1.5), 2);
        assert_eq!(normalize_percent(99.6), 100);
    }

    #[test]
    fn non_finite_degrades_to_zero() {
        assert_eq!(normalize_percent(f64::NAN), 0);
        assert_eq!(normalize_percent(f64::INFINITY), 0);
    }

    #[test]
    fn allocation_clamps_to_unit_range() {
        assert_eq!(normalize_allocation_pct(0.4), 40);
        assert_eq!(normalize_allocation_pct(60.0), 60);
        assert_eq!(normalize_allocation_pct(140.0), 100);
        assert_eq!(normalize_allocation_pct(-5.0), 0);
    }
}
