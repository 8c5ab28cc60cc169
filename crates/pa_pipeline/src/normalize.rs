//! crates/pa_pipeline/src/normalize.rs
//! Raw payload → `CanonicalReport`.
//!
//! Normalization is total: every field has a documented default, malformed
//! entries degrade to zero/empty values, and nothing here returns an error.
//! Alias resolution goes through `pa_extract::resolve`; per-item member
//! probing (inside list entries, where the alias table does not reach) uses
//! small ordered key lists local to this module.

use serde_json::Value;

use pa_core::model::{
    ActionType, CanonicalReport, CrisisResilience, CrisisScenario, DataQualityTier,
    DecisionBranch, DecisionGate, DecisionTree, ExecutionStep, HeirAllocation, HnwiTrend,
    JurisdictionAudit, MigrationProgram, Opportunity, PeerIntelligence, ProvenanceCounters,
    RiskFactor, Severity, StructuralVerdict, TaxComparison, TaxRegimeNote, TransparencyImpact,
    Verdict, WealthProjection,
};
use pa_core::percent::normalize_allocation_pct;
use pa_extract::coerce::{coerce_number, coerce_text};
use pa_extract::resolve::{resolve, resolve_number, resolve_text, Field};
use pa_metrics::derive::{
    cumulative_differential, jurisdiction_rates, risk_item_exposure, scenario_triple,
    succession_risk_from_payload, total_exposure,
};
use pa_metrics::inclusion::veto_state;

/// Normalize a raw analytics payload into the canonical model.
pub fn normalize(payload: &Value) -> CanonicalReport {
    let risk_factors = risk_factors(payload);
    let opportunities = opportunities(payload);
    let tax = tax_comparison(payload);
    let succession = succession_risk_from_payload(payload);

    let differential_points = tax.as_ref().map(|t| t.differential_points).unwrap_or(0);
    let structural_verdict =
        StructuralVerdict::from_sentinel(&resolve_text(payload, Field::StructuralVerdict, ""));
    let veto = veto_state(payload, differential_points, succession.improvement_points);

    CanonicalReport {
        client_name: resolve_text(payload, Field::ClientName, "Client"),
        verdict: verdict(payload, risk_factors.len(), opportunities.len()),
        structural_verdict,
        veto,
        provenance: provenance(payload),
        total_exposure: total_exposure(payload),
        risk_factors,
        tax,
        projection: projection(payload),
        succession,
        heirs: heirs(payload),
        heir_summary_present: resolve(payload, Field::HeirSummary).is_some(),
        transparency: transparency(payload),
        crisis: crisis(payload),
        decision_tree: decision_tree(payload),
        real_assets: real_assets(payload),
        migration_programs: migration_programs(payload),
        hnwi_trends: hnwi_trends(payload),
        tax_regimes: tax_regimes(payload),
        peers: PeerIntelligence {
            cohort_size: counter(resolve_number(payload, Field::PeerCohortSize, 0.0)),
            note: resolve_text(payload, Field::PeerCohortNote, ""),
        },
        opportunities,
        execution_sequence: execution_sequence(payload),
    }
}

// ---------------- Member probing inside list entries ----------------

fn member<'a>(block: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| block.get(k))
        .filter(|v| !matches!(v, Value::Null))
}

fn member_text(block: &Value, keys: &[&str], fallback: &str) -> String {
    match member(block, keys) {
        Some(v) => coerce_text(v, fallback),
        None => fallback.to_string(),
    }
}

fn member_number(block: &Value, keys: &[&str], fallback: f64) -> f64 {
    match member(block, keys) {
        Some(v) => coerce_number(v, fallback),
        None => fallback,
    }
}

/// Non-negative integer counter from a coerced float.
fn counter(raw: f64) -> u64 {
    if raw.is_finite() && raw > 0.0 {
        raw.round() as u64
    } else {
        0
    }
}

fn as_items(v: Option<&Value>) -> &[Value] {
    v.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

// ---------------- Verdict & provenance ----------------

fn verdict(payload: &Value, risk_count: usize, opportunity_count: usize) -> Verdict {
    let listed_risks = resolve_number(payload, Field::RiskFactorCount, 0.0);
    let listed_opps = resolve_number(payload, Field::OpportunityCount, 0.0);
    Verdict {
        classification: resolve_text(payload, Field::VerdictClassification, "UNCLASSIFIED"),
        rationale: resolve_text(payload, Field::VerdictRationale, ""),
        risk_level: Severity::from_label(&resolve_text(payload, Field::VerdictRiskLevel, "")),
        opportunity_count: if listed_opps > 0.0 {
            counter(listed_opps) as u32
        } else {
            opportunity_count as u32
        },
        risk_factor_count: if listed_risks > 0.0 {
            counter(listed_risks) as u32
        } else {
            risk_count as u32
        },
        data_quality: DataQualityTier::from_label(&resolve_text(payload, Field::DataQuality, "")),
    }
}

fn provenance(payload: &Value) -> ProvenanceCounters {
    ProvenanceCounters {
        precedents: counter(resolve_number(payload, Field::MemoPrecedentCount, 0.0)),
        failure_modes: counter(resolve_number(payload, Field::MemoFailureModeCount, 0.0)),
        sequencing_rules: counter(resolve_number(payload, Field::MemoSequencingRuleCount, 0.0)),
    }
}

// ---------------- Risk factors ----------------

const RISK_TITLE_KEYS: [&str; 5] = ["title", "name", "risk", "factor", "label"];
const RISK_SEVERITY_KEYS: [&str; 3] = ["severity", "risk_level", "level"];
const RISK_MITIGATION_KEYS: [&str; 3] = ["mitigation", "recommendation", "remediation"];
const RISK_TIMELINE_KEYS: [&str; 3] = ["timeline_days", "days_to_resolve", "timeline"];
const RISK_ACTION_KEYS: [&str; 3] = ["action_type", "action", "category"];

fn risk_factors(payload: &Value) -> Vec<RiskFactor> {
    as_items(resolve(payload, Field::RiskFactors))
        .iter()
        .map(|item| {
            let (exposure, exposure_display) = risk_item_exposure(item);
            let timeline = member_number(item, &RISK_TIMELINE_KEYS, 0.0);
            RiskFactor {
                title: member_text(item, &RISK_TITLE_KEYS, "Unspecified risk"),
                severity: Severity::from_label(&member_text(item, &RISK_SEVERITY_KEYS, "")),
                exposure,
                exposure_display,
                mitigation: member_text(item, &RISK_MITIGATION_KEYS, ""),
                timeline_days: if timeline > 0.0 { Some(timeline.round() as u32) } else { None },
                action: ActionType::from_tag(&member_text(item, &RISK_ACTION_KEYS, "")),
            }
        })
        .collect()
}

// ---------------- Tax comparison ----------------

const TAX_SOURCE_KEYS: [&str; 3] = ["source", "current", "from"];
const TAX_DESTINATION_KEYS: [&str; 3] = ["destination", "target", "to"];

fn tax_comparison(payload: &Value) -> Option<TaxComparison> {
    let block = resolve(payload, Field::TaxComparison)?;
    let source_block = member(block, &TAX_SOURCE_KEYS)?;
    let destination_block = member(block, &TAX_DESTINATION_KEYS)?;
    let source = jurisdiction_rates(source_block, "Source");
    let destination = jurisdiction_rates(destination_block, "Destination");
    let differential_points = cumulative_differential(&source, &destination);
    Some(TaxComparison { source, destination, differential_points })
}

// ---------------- Wealth projection ----------------

const STARTING_VALUE_KEYS: [&str; 4] =
    ["starting_value", "current_value", "starting_wealth", "initial_value"];

fn projection(payload: &Value) -> WealthProjection {
    let Some(block) = resolve(payload, Field::WealthProjection) else {
        return WealthProjection::default();
    };
    WealthProjection {
        starting_value: member_number(block, &STARTING_VALUE_KEYS, 0.0),
        scenarios: scenario_triple(block),
        cost_of_inaction: cost_of_inaction(block),
    }
}

/// The cost-of-inaction series arrives either as an object keyed by year
/// offset or as an array of `{year, cost}` rows. Sorted by year so the
/// series is deterministic regardless of source key order.
fn cost_of_inaction(block: &Value) -> Vec<(u32, f64)> {
    let mut series: Vec<(u32, f64)> = match block.get("cost_of_inaction") {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| {
                let year = k.trim_start_matches("year_").parse::<u32>().ok()?;
                Some((year, coerce_number(v, 0.0)))
            })
            .collect(),
        Some(Value::Array(rows)) => rows
            .iter()
            .filter_map(|row| {
                let year = member_number(row, &["year", "year_offset", "offset"], 0.0);
                if year <= 0.0 {
                    return None;
                }
                Some((year.round() as u32, member_number(row, &["cost", "value", "amount"], 0.0)))
            })
            .collect(),
        _ => Vec::new(),
    };
    series.sort_by_key(|(year, _)| *year);
    series
}

// ---------------- Succession & heirs ----------------

const HEIR_NAME_KEYS: [&str; 3] = ["name", "heir", "beneficiary"];
const HEIR_RELATIONSHIP_KEYS: [&str; 2] = ["relationship", "relation"];
const HEIR_PCT_KEYS: [&str; 4] = ["allocation_pct", "allocation", "percentage", "pct"];
const HEIR_VALUE_KEYS: [&str; 3] = ["allocation_value", "value", "amount"];
const HEIR_STRUCTURE_KEYS: [&str; 3] = ["structure", "recommended_structure", "vehicle"];

fn heirs(payload: &Value) -> Vec<HeirAllocation> {
    as_items(resolve(payload, Field::HeirAllocations))
        .iter()
        .map(|item| HeirAllocation {
            name: member_text(item, &HEIR_NAME_KEYS, "Heir"),
            relationship: member_text(item, &HEIR_RELATIONSHIP_KEYS, ""),
            // Each entry resolves independently: a 0–1 fraction and an
            // integer percentage may coexist in the same list.
            allocation_pct: normalize_allocation_pct(member_number(item, &HEIR_PCT_KEYS, 0.0)),
            allocation_value: member_number(item, &HEIR_VALUE_KEYS, 0.0),
            structure: member_text(item, &HEIR_STRUCTURE_KEYS, ""),
        })
        .collect()
}

// ---------------- Transparency / regime impact ----------------

const TRANSPARENCY_HEADLINE_KEYS: [&str; 4] = ["headline", "summary", "impact", "title"];

/// Two historical payload shapes: the `reporting_triggers` list and the
/// legacy `triggered` list. A block with neither a trigger list nor a
/// headline does not count as a parseable impact model.
fn transparency(payload: &Value) -> Option<TransparencyImpact> {
    let block = resolve(payload, Field::RegimeImpact)?;
    let triggers = block
        .get("reporting_triggers")
        .or_else(|| block.get("triggered"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|v| coerce_text(v, ""))
                .filter(|s| !s.is_empty())
                .collect::<Vec<String>>()
        });
    let headline = member_text(block, &TRANSPARENCY_HEADLINE_KEYS, "");
    if triggers.is_none() && headline.is_empty() {
        return None;
    }
    Some(TransparencyImpact { headline, triggers: triggers.unwrap_or_default() })
}

// ---------------- Crisis resilience ----------------

const CRISIS_OVERALL_KEYS: [&str; 3] = ["overall", "summary", "overall_resilience"];
const CRISIS_NAME_KEYS: [&str; 3] = ["name", "scenario", "label"];
const CRISIS_IMPACT_KEYS: [&str; 3] = ["impact", "outcome", "result"];

fn crisis(payload: &Value) -> CrisisResilience {
    let Some(block) = resolve(payload, Field::CrisisResilience) else {
        return CrisisResilience::default();
    };
    // The legacy shape is a bare array of scenario rows.
    let rows = block
        .get("scenarios")
        .and_then(Value::as_array)
        .or_else(|| block.as_array());
    let scenarios = rows
        .map(|items| {
            items
                .iter()
                .map(|row| CrisisScenario {
                    name: member_text(row, &CRISIS_NAME_KEYS, "Scenario"),
                    impact: member_text(row, &CRISIS_IMPACT_KEYS, ""),
                })
                .collect()
        })
        .unwrap_or_default();
    let overall = member_text(block, &CRISIS_OVERALL_KEYS, "");
    CrisisResilience {
        overall: if overall.is_empty() { None } else { Some(overall) },
        scenarios,
    }
}

// ---------------- Decision tree ----------------

fn decision_tree(payload: &Value) -> DecisionTree {
    let Some(block) = resolve(payload, Field::DecisionTree) else {
        return DecisionTree::default();
    };
    let branches = as_items(block.get("branches").or_else(|| block.get("scenarios")))
        .iter()
        .map(|row| DecisionBranch {
            label: member_text(row, &["label", "name", "branch"], "Branch"),
            outcome: member_text(row, &["outcome", "result", "consequence"], ""),
        })
        .collect();
    let gates = as_items(block.get("gates").or_else(|| block.get("checks")))
        .iter()
        .map(|row| DecisionGate {
            label: member_text(row, &["label", "name", "gate"], "Gate"),
            pass: member_number(row, &["pass", "passed", "ok"], 0.0) != 0.0,
        })
        .collect();
    DecisionTree { branches, gates }
}

// ---------------- Real-asset audit ----------------

/// Keys in the real-asset block that are not jurisdiction entries.
const RESERVED_AUDIT_KEYS: [&str; 5] = ["meta", "global", "summary", "notes", "total"];

const STAMP_DUTY_KEYS: [&str; 3] = ["stamp_duty", "absd", "transfer_tax"];
const LOOPHOLE_KEYS: [&str; 2] = ["loophole", "exemption"];
const TRUST_KEYS: [&str; 2] = ["trust", "trust_structure"];
const VEHICLE_KEYS: [&str; 3] = ["succession_vehicle", "vehicle", "holding_structure"];
const FREEPORT_KEYS: [&str; 2] = ["freeport", "freeport_storage"];

fn real_assets(payload: &Value) -> Vec<JurisdictionAudit> {
    let Some(Value::Object(map)) = resolve(payload, Field::RealAssetAudit) else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| {
            !key.starts_with('_') && !RESERVED_AUDIT_KEYS.contains(&key.as_str())
        })
        .map(|(jurisdiction, block)| JurisdictionAudit {
            jurisdiction: jurisdiction.clone(),
            stamp_duty: optional_text(block, &STAMP_DUTY_KEYS),
            loophole: optional_text(block, &LOOPHOLE_KEYS),
            trust: optional_text(block, &TRUST_KEYS),
            succession_vehicle: optional_text(block, &VEHICLE_KEYS),
            freeport: optional_text(block, &FREEPORT_KEYS),
        })
        .collect()
}

fn optional_text(block: &Value, keys: &[&str]) -> Option<String> {
    let text = member_text(block, keys, "");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ---------------- Supplementary intelligence sections ----------------

fn migration_programs(payload: &Value) -> Vec<MigrationProgram> {
    as_items(resolve(payload, Field::MigrationPrograms))
        .iter()
        .map(|row| MigrationProgram {
            name: member_text(row, &["name", "program", "title"], "Program"),
            jurisdiction: member_text(row, &["jurisdiction", "country"], ""),
            min_investment: member_number(row, &["min_investment", "minimum", "investment"], 0.0),
            timeline: member_text(row, &["timeline", "processing_time", "duration"], ""),
        })
        .collect()
}

fn hnwi_trends(payload: &Value) -> Vec<HnwiTrend> {
    as_items(resolve(payload, Field::HnwiTrends))
        .iter()
        .map(|row| match row {
            Value::String(s) => HnwiTrend { label: s.clone(), note: String::new() },
            _ => HnwiTrend {
                label: member_text(row, &["label", "trend", "title"], "Trend"),
                note: member_text(row, &["note", "detail", "summary"], ""),
            },
        })
        .collect()
}

/// Tax-regime intelligence arrives either as a list of entries or as an
/// object keyed by jurisdiction.
fn tax_regimes(payload: &Value) -> Vec<TaxRegimeNote> {
    match resolve(payload, Field::TaxRegimeIntelligence) {
        Some(Value::Array(rows)) => rows
            .iter()
            .map(|row| TaxRegimeNote {
                jurisdiction: member_text(row, &["jurisdiction", "country", "name"], "Unknown"),
                summary: member_text(row, &["summary", "regime", "note"], ""),
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(jurisdiction, v)| TaxRegimeNote {
                jurisdiction: jurisdiction.clone(),
                summary: coerce_text(v, ""),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn opportunities(payload: &Value) -> Vec<Opportunity> {
    as_items(resolve(payload, Field::Opportunities))
        .iter()
        .map(|row| Opportunity {
            title: member_text(row, &["title", "name", "opportunity"], "Opportunity"),
            upside: member_number(row, &["upside", "value", "savings", "amount"], 0.0),
            note: member_text(row, &["note", "detail", "description"], ""),
        })
        .collect()
}

fn execution_sequence(payload: &Value) -> Vec<ExecutionStep> {
    as_items(resolve(payload, Field::ExecutionSequence))
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let order = member_number(row, &["order", "step", "sequence"], 0.0);
            ExecutionStep {
                order: if order > 0.0 { order.round() as u32 } else { (index + 1) as u32 },
                action: member_text(row, &["action", "task", "description"], ""),
                timeline: member_text(row, &["timeline", "when", "window"], ""),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_payload_normalizes_to_defaults() {
        let report = normalize(&json!({}));
        assert_eq!(report.client_name, "Client");
        assert_eq!(report.verdict.classification, "UNCLASSIFIED");
        assert_eq!(report.verdict.risk_level, Severity::Medium);
        assert_eq!(report.verdict.data_quality, DataQualityTier::Moderate);
        assert_eq!(report.structural_verdict, StructuralVerdict::Proceed);
        assert!(report.veto.is_none());
        assert_eq!(report.total_exposure, 0.0);
        assert!(report.risk_factors.is_empty());
        assert!(report.tax.is_none());
    }

    #[test]
    fn mixed_fraction_and_integer_heir_allocations() {
        let payload = json!({
            "preview": {
                "heir_allocations": [
                    { "name": "A", "allocation_pct": 0.4 },
                    { "name": "B", "allocation_pct": 60 }
                ]
            }
        });
        let report = normalize(&payload);
        assert_eq!(report.heirs[0].allocation_pct, 40);
        assert_eq!(report.heirs[1].allocation_pct, 60);
    }

    #[test]
    fn risk_factor_rows_normalize_with_aliases() {
        let payload = json!({
            "preview": {
                "risk_factors": [{
                    "name": "ABSD exposure",
                    "risk_level": "critical",
                    "cost": "ABSD: $500,000",
                    "recommendation": "Restructure holding entity",
                    "timeline_days": 90,
                    "action_type": "restructuring"
                }]
            }
        });
        let report = normalize(&payload);
        let factor = &report.risk_factors[0];
        assert_eq!(factor.title, "ABSD exposure");
        assert_eq!(factor.severity, Severity::Critical);
        assert_eq!(factor.exposure, 500_000.0);
        assert_eq!(factor.timeline_days, Some(90));
        assert_eq!(factor.action, Some(ActionType::Restructure));
    }

    #[test]
    fn tax_block_requires_both_jurisdictions() {
        let only_source = json!({
            "preview": { "tax_comparison": { "source": { "income": 45 } } }
        });
        assert!(normalize(&only_source).tax.is_none());

        let both = json!({
            "preview": {
                "tax_comparison": {
                    "source": { "name": "UK", "income": 0.45 },
                    "destination": { "name": "SG", "income": 22 }
                }
            }
        });
        let tax = normalize(&both).tax.expect("tax");
        assert_eq!(tax.source.income, 45);
        assert_eq!(tax.differential_points, 23);
    }

    #[test]
    fn cost_of_inaction_object_and_array_shapes() {
        let object_shape = json!({
            "preview": {
                "wealth_projection_data": {
                    "starting_value": 5_000_000,
                    "cost_of_inaction": { "year_5": 400_000, "year_1": 80_000 }
                }
            }
        });
        let p = normalize(&object_shape).projection;
        assert_eq!(p.cost_of_inaction, vec![(1, 80_000.0), (5, 400_000.0)]);

        let array_shape = json!({
            "preview": {
                "wealth_projection_data": {
                    "cost_of_inaction": [
                        { "year": 3, "cost": 240_000 },
                        { "year": 1, "cost": 80_000 }
                    ]
                }
            }
        });
        let p = normalize(&array_shape).projection;
        assert_eq!(p.cost_of_inaction, vec![(1, 80_000.0), (3, 240_000.0)]);
    }

    #[test]
    fn transparency_shapes_and_rejection() {
        let modern = json!({
            "preview": {
                "transparency_impact": {
                    "headline": "CRS exposure widens",
                    "reporting_triggers": ["CRS", "FATCA"]
                }
            }
        });
        let impact = normalize(&modern).transparency.expect("impact");
        assert_eq!(impact.triggers, vec!["CRS", "FATCA"]);

        let legacy = json!({
            "preview": { "regime_impact": { "triggered": ["CRS"] } }
        });
        assert!(normalize(&legacy).transparency.is_some());

        let unparseable = json!({
            "preview": { "regime_impact": { "version": 3 } }
        });
        assert!(normalize(&unparseable).transparency.is_none());
    }

    #[test]
    fn real_asset_reserved_keys_are_filtered() {
        let payload = json!({
            "preview": {
                "real_asset_audit": {
                    "_meta": { "version": 2 },
                    "global": { "summary": "n/a" },
                    "SG": { "stamp_duty": "ABSD 60%" },
                    "UK": { "notes_only": true }
                }
            }
        });
        let report = normalize(&payload);
        let names: Vec<&str> =
            report.real_assets.iter().map(|j| j.jurisdiction.as_str()).collect();
        assert_eq!(names, vec!["SG", "UK"]);
        assert!(report.real_assets[0].has_content());
        assert!(!report.real_assets[1].has_content());
    }

    #[test]
    fn execution_steps_get_ordinal_fallback() {
        let payload = json!({
            "preview": {
                "execution_sequence": [
                    { "action": "Open holding entity" },
                    { "action": "Transfer assets", "order": 7 }
                ]
            }
        });
        let steps = normalize(&payload).execution_sequence;
        assert_eq!(steps[0].order, 1);
        assert_eq!(steps[1].order, 7);
    }

    #[test]
    fn veto_payload_carries_exclusive_state() {
        let payload = json!({
            "preview": {
                "structural_verdict": "DO_NOT_PROCEED",
                "via_negativa": { "day_one_loss_pct": 14, "headline": "Vetoed" }
            }
        });
        let report = normalize(&payload);
        assert!(report.structural_verdict.is_veto());
        let veto = report.veto.expect("veto state");
        assert!(!veto.liquidity_pass);
        assert_eq!(veto.headline, "Vetoed");
    }
}
