//! crates/pa_metrics/src/inclusion.rs
//! Section inclusion gates: one independent, idempotent predicate per
//! optional document section, plus the via-negativa veto override.
//!
//! The veto is the only ordering concern: it is evaluated first and
//! short-circuits the presentation of the verdict section. Every other
//! predicate is order-independent and re-evaluates to the same answer
//! against an unchanged canonical model.

use serde_json::Value;

use pa_core::model::{CanonicalReport, ScenarioKind, ViaNegativaState};
use pa_core::percent::normalize_percent;
use pa_extract::resolve::{resolve, resolve_number, resolve_text, Field};

/// Day-one loss percentage below which the liquidity gate passes.
pub const LIQUIDITY_DAY_ONE_LOSS_MAX_PCT: i64 = 10;

/// Which optional sections the assembled document carries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SectionSet {
    pub veto: bool,
    pub wealth_projection: bool,
    pub transparency: bool,
    pub crisis: bool,
    pub decision_tree: bool,
    pub heirs: bool,
    pub real_assets: bool,
    pub migration_programs: bool,
    pub hnwi_trends: bool,
    pub tax_regimes: bool,
    pub opportunities: bool,
    pub execution_sequence: bool,
}

impl SectionSet {
    /// Evaluate every predicate against the canonical model.
    pub fn evaluate(report: &CanonicalReport) -> Self {
        SectionSet {
            // Veto first: it re-skins the verdict and suppresses the
            // approval narrative elsewhere.
            veto: report.structural_verdict.is_veto(),
            wealth_projection: include_wealth_projection(report),
            transparency: report.transparency.is_some(),
            crisis: report.crisis.overall.is_some() || !report.crisis.scenarios.is_empty(),
            decision_tree: !report.decision_tree.branches.is_empty()
                || !report.decision_tree.gates.is_empty(),
            heirs: !report.heirs.is_empty() || report.heir_summary_present,
            real_assets: report.real_assets.iter().any(|j| j.has_content()),
            migration_programs: !report.migration_programs.is_empty(),
            hnwi_trends: !report.hnwi_trends.is_empty(),
            tax_regimes: !report.tax_regimes.is_empty(),
            opportunities: !report.opportunities.is_empty(),
            execution_sequence: !report.execution_sequence.is_empty(),
        }
    }
}

fn include_wealth_projection(report: &CanonicalReport) -> bool {
    if report.projection.starting_value > 0.0 {
        return true;
    }
    report
        .projection
        .scenario(ScenarioKind::Base)
        .is_some_and(|s| s.ten_year_value > 0.0)
}

/// Compute the via-negativa overlay from the raw payload.
///
/// `None` unless the structural verdict is the veto sentinel. The three gates
/// read dedicated veto fields when present and fall back to thresholds over
/// the already-derived figures: tax efficiency passes on a non-negative
/// differential, liquidity on a day-one loss under
/// [`LIQUIDITY_DAY_ONE_LOSS_MAX_PCT`], structure on a positive
/// succession improvement.
pub fn veto_state(
    payload: &Value,
    differential_points: i64,
    improvement_points: i64,
) -> Option<ViaNegativaState> {
    let sentinel = resolve_text(payload, Field::StructuralVerdict, "");
    if !pa_core::model::StructuralVerdict::from_sentinel(&sentinel).is_veto() {
        return None;
    }

    let day_one_loss =
        normalize_percent(resolve_number(payload, Field::VetoDayOneLossPct, 0.0));

    Some(ViaNegativaState {
        tax_efficiency_pass: gate_flag(
            payload,
            Field::VetoTaxEfficiencyPass,
            differential_points >= 0,
        ),
        liquidity_pass: gate_flag(
            payload,
            Field::VetoLiquidityPass,
            day_one_loss < LIQUIDITY_DAY_ONE_LOSS_MAX_PCT,
        ),
        structure_pass: gate_flag(payload, Field::VetoStructurePass, improvement_points > 0),
        headline: resolve_text(payload, Field::VetoHeadline, "Structure vetoed"),
        rationale: resolve_text(
            payload,
            Field::VetoRationale,
            "Structural viability gate failed",
        ),
    })
}

/// Explicit boolean gate field when present; `fallback` otherwise.
fn gate_flag(payload: &Value, field: Field, fallback: bool) -> bool {
    match resolve(payload, field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "pass" | "yes" => true,
            "false" | "fail" | "no" => false,
            _ => fallback,
        },
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_core::model::*;
    use serde_json::json;

    fn empty_report() -> CanonicalReport {
        CanonicalReport {
            client_name: "Client".into(),
            verdict: Verdict {
                classification: "UNCLASSIFIED".into(),
                rationale: String::new(),
                risk_level: Severity::Medium,
                opportunity_count: 0,
                risk_factor_count: 0,
                data_quality: DataQualityTier::Moderate,
            },
            structural_verdict: StructuralVerdict::Proceed,
            veto: None,
            provenance: ProvenanceCounters::default(),
            risk_factors: Vec::new(),
            total_exposure: 0.0,
            tax: None,
            projection: WealthProjection::default(),
            succession: SuccessionRisk::default(),
            heirs: Vec::new(),
            heir_summary_present: false,
            transparency: None,
            crisis: CrisisResilience::default(),
            decision_tree: DecisionTree::default(),
            real_assets: Vec::new(),
            migration_programs: Vec::new(),
            hnwi_trends: Vec::new(),
            tax_regimes: Vec::new(),
            peers: PeerIntelligence::default(),
            opportunities: Vec::new(),
            execution_sequence: Vec::new(),
        }
    }

    #[test]
    fn empty_model_includes_nothing_optional() {
        let set = SectionSet::evaluate(&empty_report());
        assert_eq!(set, SectionSet::default());
    }

    #[test]
    fn predicates_are_idempotent() {
        let mut report = empty_report();
        report.projection.starting_value = 5_000_000.0;
        report.heir_summary_present = true;
        let first = SectionSet::evaluate(&report);
        let second = SectionSet::evaluate(&report);
        assert_eq!(first, second);
        assert!(first.wealth_projection);
        assert!(first.heirs);
    }

    #[test]
    fn wealth_projection_via_base_scenario_only() {
        let mut report = empty_report();
        report.projection.scenarios = vec![Scenario {
            kind: ScenarioKind::Base,
            probability: 0.55,
            ten_year_value: 12_000_000.0,
        }];
        assert!(SectionSet::evaluate(&report).wealth_projection);
    }

    #[test]
    fn real_assets_need_actual_content() {
        let mut report = empty_report();
        report.real_assets = vec![JurisdictionAudit { jurisdiction: "SG".into(), ..Default::default() }];
        assert!(!SectionSet::evaluate(&report).real_assets);
        report.real_assets[0].freeport = Some("Le Freeport vault".into());
        assert!(SectionSet::evaluate(&report).real_assets);
    }

    #[test]
    fn no_veto_without_sentinel() {
        let payload = json!({ "preview": { "structural_verdict": "PROCEED" } });
        assert!(veto_state(&payload, 10, 5).is_none());
        assert!(veto_state(&json!({}), -50, -5).is_none());
    }

    #[test]
    fn veto_gates_fall_back_to_thresholds() {
        let payload = json!({
            "preview": {
                "structural_verdict": "DO_NOT_PROCEED",
                "via_negativa": { "day_one_loss_pct": 14 }
            }
        });
        let state = veto_state(&payload, -12, 0).expect("veto");
        assert!(!state.tax_efficiency_pass); // differential negative
        assert!(!state.liquidity_pass); // 14 >= 10
        assert!(!state.structure_pass); // no improvement
    }

    #[test]
    fn explicit_gate_fields_override_thresholds() {
        let payload = json!({
            "preview": {
                "structural_verdict": "DO_NOT_PROCEED",
                "via_negativa": {
                    "tax_efficiency_pass": true,
                    "liquidity_pass": false,
                    "structure_pass": "pass"
                }
            }
        });
        let state = veto_state(&payload, -12, 0).expect("veto");
        assert!(state.tax_efficiency_pass);
        assert!(!state.liquidity_pass);
        assert!(state.structure_pass);
    }

    #[test]
    fn fractional_day_one_loss_normalizes_before_threshold() {
        let payload = json!({
            "preview": {
                "structural_verdict": "DO_NOT_PROCEED",
                "via_negativa": { "day_one_loss_pct": 0.08 }
            }
        });
        let state = veto_state(&payload, 0, 1).expect("veto");
        assert!(state.liquidity_pass); // 8 < 10
    }
}
