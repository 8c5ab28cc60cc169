//! crates/pa_core/src/format.rs
//! Display formatting for currency magnitudes and signed percent points.
//!
//! Formatting is presentation-only: the canonical model always carries raw
//! numbers, and these helpers are applied at render time. Rules are fixed and
//! locale-neutral (ASCII, `$`, `+`/`-`):
//!
//! - ≥ 1B  → `B` suffix, 2 decimals  (`$1.25B`)
//! - ≥ 1M  → `M` suffix, 2 decimals  (`$1.35M`)
//! - ≥ 10K → `K` suffix, 0 decimals  (`$50K`)
//! - ≥ 1K  → `K` suffix, 1 decimal   (`$1.5K`)
//! - below → grouped integer         (`$750`)
//!
//! Positive percentages always carry an explicit `+`.

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const TEN_THOUSAND: f64 = 10_000.0;
const THOUSAND: f64 = 1_000.0;

/// Format a raw currency amount per the fixed magnitude rules.
/// Non-finite input renders as `$0`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let mag = amount.abs();

    if mag >= BILLION {
        format!("{sign}${:.2}B", mag / BILLION)
    } else if mag >= MILLION {
        format!("{sign}${:.2}M", mag / MILLION)
    } else if mag >= TEN_THOUSAND {
        format!("{sign}${:.0}K", mag / THOUSAND)
    } else if mag >= THOUSAND {
        format!("{sign}${:.1}K", mag / THOUSAND)
    } else {
        format!("{sign}${}", group_thousands(mag.round() as u64))
    }
}

/// Group an integer with `,` thousands separators (`2700000` → `"2,700,000"`).
pub fn group_thousands(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups: Vec<String> = Vec::new();
    while n > 0 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    let mut out = groups.pop().unwrap_or_default();
    // Strip leading zeros from the most significant group.
    out = out.trim_start_matches('0').to_string();
    if out.is_empty() {
        out.push('0');
    }
    while let Some(g) = groups.pop() {
        out.push(',');
        out.push_str(&g);
    }
    out
}

/// Render signed percent points with an explicit `+` when positive.
pub fn signed_percent_points(points: i64) -> String {
    if points > 0 {
        format!("+{points}%")
    } else {
        format!("{points}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_suffixes() {
        assert_eq!(format_currency(1_250_000_000.0), "$1.25B");
        assert_eq!(format_currency(1_350_000.0), "$1.35M");
        assert_eq!(format_currency(50_000.0), "$50K");
        assert_eq!(format_currency(1_500.0), "$1.5K");
        assert_eq!(format_currency(750.0), "$750");
        assert_eq!(format_currency(0.0), "$0");
    }

    #[test]
    fn negative_amounts_keep_sign_outside_dollar() {
        assert_eq!(format_currency(-2_700_000.0), "-$2.70M");
        assert_eq!(format_currency(-500.0), "-$500");
    }

    #[test]
    fn grouping_below_one_thousand_boundary() {
        assert_eq!(group_thousands(2_700_000), "2,700,000");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(0), "0");
    }

    #[test]
    fn percent_sign_is_explicit_when_positive() {
        assert_eq!(signed_percent_points(12), "+12%");
        assert_eq!(signed_percent_points(0), "0%");
        assert_eq!(signed_percent_points(-3), "-3%");
    }

    #[test]
    fn non_finite_renders_zero() {
        assert_eq!(format_currency(f64::NAN), "$0");
    }
}
