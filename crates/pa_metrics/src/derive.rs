//! crates/pa_metrics/src/derive.rs
//! Aggregate figures not present verbatim in the payload.
//!
//! Every derivation degrades item-by-item: an entry that yields nothing
//! contributes zero and is excluded from the aggregate rather than aborting
//! the document.

use serde_json::Value;

use pa_core::model::{JurisdictionRates, Scenario, ScenarioKind, SuccessionRisk};
use pa_core::percent::normalize_percent;
use pa_extract::coerce::{coerce_number, coerce_text};
use pa_extract::money::parse_amount;
use pa_extract::resolve::{resolve, resolve_number, Field};

/// Numeric members probed on a risk item for its exposure amount.
const ITEM_NUMERIC_KEYS: [&str; 4] =
    ["exposure_numeric", "cost_numeric", "exposure_amount", "amount"];

/// Display members probed when the numeric exposure is absent or zero.
const ITEM_DISPLAY_KEYS: [&str; 4] = ["exposure", "cost", "impact", "exposure_display"];

/// Exposure of a single risk item: numeric field first, display string as the
/// fallback. Returns the amount and the display string (when one existed).
pub fn risk_item_exposure(item: &Value) -> (f64, Option<String>) {
    let display = ITEM_DISPLAY_KEYS
        .iter()
        .find_map(|k| item.get(k))
        .map(|v| coerce_text(v, ""))
        .filter(|s| !s.is_empty());

    let numeric = ITEM_NUMERIC_KEYS
        .iter()
        .find_map(|k| item.get(k))
        .map(|v| coerce_number(v, 0.0))
        .unwrap_or(0.0);

    if numeric > 0.0 {
        return (numeric, display);
    }
    let parsed = display.as_deref().map(parse_amount).unwrap_or(0.0);
    (parsed, display)
}

/// Total risk exposure.
///
/// Preference order: a pre-formatted total from the payload (run through the
/// monetary parser), else the sum of per-item exposures.
pub fn total_exposure(payload: &Value) -> f64 {
    let preformatted = resolve_number(payload, Field::TotalExposure, 0.0);
    if preformatted > 0.0 {
        return preformatted;
    }
    match resolve(payload, Field::RiskFactors).and_then(Value::as_array) {
        Some(items) => items.iter().map(|item| risk_item_exposure(item).0).sum(),
        None => 0.0,
    }
}

/// Succession-risk improvement: `current − with_structure`, both operands
/// percent-normalized (a raw `0.35` and a raw `35` are the same figure).
pub fn succession_risk(current_raw: f64, with_structure_raw: f64) -> SuccessionRisk {
    let current_pct = normalize_percent(current_raw);
    let with_structure_pct = normalize_percent(with_structure_raw);
    SuccessionRisk {
        current_pct,
        with_structure_pct,
        improvement_points: current_pct - with_structure_pct,
    }
}

/// Convenience: read both succession operands from the payload.
pub fn succession_risk_from_payload(payload: &Value) -> SuccessionRisk {
    succession_risk(
        resolve_number(payload, Field::SuccessionRiskCurrent, 0.0),
        resolve_number(payload, Field::SuccessionRiskWithStructure, 0.0),
    )
}

const NAME_KEYS: [&str; 3] = ["name", "jurisdiction", "country"];
const INCOME_KEYS: [&str; 3] = ["income", "income_tax", "income_rate"];
const CAPITAL_GAINS_KEYS: [&str; 3] = ["capital_gains", "cgt", "capital_gains_rate"];
const ESTATE_KEYS: [&str; 3] = ["estate", "estate_tax", "inheritance"];
const WEALTH_KEYS: [&str; 2] = ["wealth", "wealth_tax"];

/// Read one jurisdiction's rate table, percent-normalizing each category so a
/// payload mixing `0.45` and `45` resolves consistently.
pub fn jurisdiction_rates(block: &Value, fallback_name: &str) -> JurisdictionRates {
    let name = NAME_KEYS
        .iter()
        .find_map(|k| block.get(k))
        .map(|v| coerce_text(v, fallback_name))
        .unwrap_or_else(|| fallback_name.to_string());
    JurisdictionRates {
        name,
        income: rate_points(block, &INCOME_KEYS),
        capital_gains: rate_points(block, &CAPITAL_GAINS_KEYS),
        estate: rate_points(block, &ESTATE_KEYS),
        wealth: rate_points(block, &WEALTH_KEYS),
    }
}

fn rate_points(block: &Value, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|k| block.get(k))
        .map(|v| normalize_percent(coerce_number(v, 0.0)))
        .unwrap_or(0)
}

/// Cumulative tax differential: Σ (source − destination) across the fixed
/// category list. Positive = savings (rendered with a leading `+`).
pub fn cumulative_differential(
    source: &JurisdictionRates,
    destination: &JurisdictionRates,
) -> i64 {
    source.total_points() - destination.total_points()
}

const PROBABILITY_KEYS: [&str; 3] = ["probability", "prob", "likelihood"];
const TEN_YEAR_KEYS: [&str; 4] = ["ten_year_value", "year_10", "terminal_value", "value_10yr"];

/// The labeled scenario triple (base / stress / opportunity).
///
/// Probabilities default to 0.55 / 0.25 / 0.20 when absent. The triple is
/// never summed here — the rendering layer tabulates it.
pub fn scenario_triple(projection: &Value) -> Vec<Scenario> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| {
            let block = projection
                .get(kind.as_str())
                .or_else(|| projection.pointer(&format!("/scenarios/{}", kind.as_str())));
            match block {
                Some(b) => Scenario {
                    kind: *kind,
                    probability: member_number(b, &PROBABILITY_KEYS)
                        .map(normalize_probability)
                        .unwrap_or_else(|| kind.default_probability()),
                    ten_year_value: member_number(b, &TEN_YEAR_KEYS).unwrap_or(0.0),
                },
                None => Scenario {
                    kind: *kind,
                    probability: kind.default_probability(),
                    ten_year_value: 0.0,
                },
            }
        })
        .collect()
}

/// First numeric member among `keys` (coerced; wrapped values accepted).
fn member_number(block: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| block.get(k)).map(|v| coerce_number(v, 0.0))
}

/// Probabilities arrive either as a 0–1 fraction or as percent points;
/// normalize to a 0–1 fraction.
fn normalize_probability(raw: f64) -> f64 {
    if !raw.is_finite() || raw < 0.0 {
        return 0.0;
    }
    if raw > 1.0 {
        (raw / 100.0).min(1.0)
    } else {
        raw
    }
}
