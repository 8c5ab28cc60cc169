//! crates/pa_extract/src/money.rs
//! Monetary amount extraction from free-form upstream strings.
//!
//! The analytics service emits exposure figures in whatever phrasing its own
//! prompt produced: `"60% of property value = $2,700,000"`, `"$1.35M"`,
//! `"ABSD: $500,000"`, sometimes a bare `"250000"`. This parser is total
//! (never panics, 0.0 on failure) and follows a strict precedence order:
//!
//! 1. if the string contains `=`, work on the substring after the *last* `=`;
//! 2. `$<number><M|K>` (case-insensitive) — checked before comma-grouped
//!    patterns so `$50K` is not mis-read as `$50`;
//! 3. comma-grouped dollar amount (`$1,350,000`; plain `$2700000` also);
//! 4. nothing matched post-`=` → repeat 2–3 on the full string;
//! 5. bare `<number>M|K` without a leading `$`;
//! 6. neither `%` nor an `M`/`K` suffix anywhere → a bare numeric prefix.
//!
//! `M` multiplies by 1,000,000; `K` by 1,000.

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Extract a numeric dollar amount from `text`; 0.0 when nothing parses.
pub fn parse_amount(text: &str) -> f64 {
    let full = text.trim();
    if full.is_empty() {
        return 0.0;
    }

    // 1. "X% of value = $amount" phrasing: only look after the last '='.
    let work = match full.rfind('=') {
        Some(i) => full[i + 1..].trim(),
        None => full,
    };

    if let Some(v) = scan_dollar_suffixed(work).or_else(|| scan_dollar_grouped(work)) {
        return v;
    }
    // 4. fall back to the whole string when the post-'=' slice had no match.
    if work.len() != full.len() {
        if let Some(v) = scan_dollar_suffixed(full).or_else(|| scan_dollar_grouped(full)) {
            return v;
        }
    }
    if let Some(v) = scan_bare_suffixed(full) {
        return v;
    }
    // 6. A bare percent figure must not be read as a dollar amount, and a
    //    number whose suffix failed the word-boundary check ("10km") is a
    //    unit of something else, not a truncated amount.
    if !full.contains('%') && !has_magnitude_suffix(full) {
        if let Some(v) = numeric_prefix(work).or_else(|| numeric_prefix(full)) {
            return v;
        }
    }
    0.0
}

/* ---------------- scanners (byte-level, no allocation on the hot path) ---------------- */

fn suffix_multiplier(b: u8) -> Option<f64> {
    match b {
        b'M' | b'm' => Some(MILLION),
        b'K' | b'k' => Some(THOUSAND),
        _ => None,
    }
}

/// True when position `i` is the end of the string or a non-word byte, i.e.
/// an acceptable boundary after a magnitude suffix.
fn boundary_at(bytes: &[u8], i: usize) -> bool {
    i >= bytes.len() || !bytes[i].is_ascii_alphanumeric()
}

/// Read `<digits>[.<digits>]` at `i` (no comma groups). Returns (value, next).
fn read_plain_number(bytes: &[u8], mut i: usize) -> Option<(f64, usize)> {
    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        return None;
    }
    let mut end = i;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 {
            end = j;
        }
    }
    let text = core::str::from_utf8(&bytes[start..end]).ok()?;
    text.parse::<f64>().ok().map(|v| (v, end))
}

/// Read `<digits>(,<3 digits>)*[.<digits>]` at `i`. Returns (value, next).
fn read_grouped_number(bytes: &[u8], mut i: usize) -> Option<(f64, usize)> {
    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        return None;
    }
    // comma groups must be exactly three digits
    while i + 4 <= bytes.len()
        && bytes[i] == b','
        && bytes[i + 1..i + 4].iter().all(u8::is_ascii_digit)
    {
        i += 4;
    }
    let mut end = i;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 {
            end = j;
        }
    }
    let raw = core::str::from_utf8(&bytes[start..end]).ok()?;
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().map(|v| (v, end))
}

/// `$<number><M|K>` anywhere in `s`.
fn scan_dollar_suffixed(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'$' {
            continue;
        }
        if let Some((v, j)) = read_plain_number(bytes, i + 1) {
            if j < bytes.len() {
                if let Some(mult) = suffix_multiplier(bytes[j]) {
                    if boundary_at(bytes, j + 1) {
                        return Some(v * mult);
                    }
                }
            }
        }
    }
    None
}

/// `$<grouped number>` anywhere in `s` (commas optional).
fn scan_dollar_grouped(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'$' {
            continue;
        }
        if let Some((v, _)) = read_grouped_number(bytes, i + 1) {
            return Some(v);
        }
    }
    None
}

/// `<number><M|K>` without a leading `$`, at a word boundary.
fn scan_bare_suffixed(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let at_boundary = i == 0
            || (!bytes[i - 1].is_ascii_alphanumeric()
                && bytes[i - 1] != b'$'
                && bytes[i - 1] != b'.');
        if bytes[i].is_ascii_digit() && at_boundary {
            if let Some((v, j)) = read_plain_number(bytes, i) {
                if j < bytes.len() {
                    if let Some(mult) = suffix_multiplier(bytes[j]) {
                        if boundary_at(bytes, j + 1) {
                            return Some(v * mult);
                        }
                    }
                }
                i = j;
                continue;
            }
        }
        i += 1;
    }
    None
}

/// True when any digit is immediately followed by an `M`/`K` letter.
fn has_magnitude_suffix(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_digit() && suffix_multiplier(w[1]).is_some())
}

/// Leading numeric value of `s` (comma groups allowed), if it starts with one.
fn numeric_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    read_grouped_number(bytes, 0).map(|(v, _)| v)
}

/* ------------------------------------- Tests -------------------------------------- */
