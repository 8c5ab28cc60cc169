//! crates/pa_extract/src/resolve.rs
//! Declarative field-alias table and first-defined-value resolution.
//!
//! The same concept has appeared under five or six field names across the
//! upstream service's schema versions (`peer_cohort_stats.total_hnwis` vs the
//! older `total_peers`, flat vs nested verdict blocks, and so on). Rather
//! than repeating ad-hoc fallback chains at every use site, each canonical
//! field carries one ordered list of JSON Pointer candidate paths here.
//!
//! Resolution order is part of the contract: newer/preferred names come
//! first, legacy names last, so a payload carrying both resolves to the
//! newer value. `resolve` returns the first candidate that is defined and
//! not an empty string; it does **not** coerce — callers apply `coerce`
//! afterward.

use serde_json::Value;

use crate::coerce::{coerce_number, coerce_text};

/// Canonical fields of the raw report payload. The payload has two top-level
/// regions: `preview` (human-facing summary, heavily aliased) and `memo`
/// (intelligence provenance counters).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    ClientName,
    VerdictClassification,
    VerdictRationale,
    VerdictRiskLevel,
    OpportunityCount,
    RiskFactorCount,
    DataQuality,
    RiskFactors,
    TotalExposure,
    TaxComparison,
    WealthProjection,
    HeirAllocations,
    HeirSummary,
    SuccessionRiskCurrent,
    SuccessionRiskWithStructure,
    RegimeImpact,
    CrisisResilience,
    DecisionTree,
    RealAssetAudit,
    MigrationPrograms,
    HnwiTrends,
    TaxRegimeIntelligence,
    PeerCohortSize,
    PeerCohortNote,
    Opportunities,
    ExecutionSequence,
    StructuralVerdict,
    VetoHeadline,
    VetoRationale,
    VetoTaxEfficiencyPass,
    VetoLiquidityPass,
    VetoStructurePass,
    VetoDayOneLossPct,
    MemoPrecedentCount,
    MemoFailureModeCount,
    MemoSequencingRuleCount,
}

impl Field {
    /// Ordered candidate paths, preferred first, legacy last.
    pub fn paths(&self) -> &'static [&'static str] {
        use Field::*;
        match self {
            ClientName => &["/preview/client_name", "/preview/client/name", "/preview/profile/name"],
            VerdictClassification => &[
                "/preview/verdict/classification",
                "/preview/verdict_classification",
                "/preview/pattern_verdict",
                "/preview/verdict",
            ],
            VerdictRationale => &[
                "/preview/verdict/rationale",
                "/preview/verdict_rationale",
                "/preview/verdict_reasoning",
                "/preview/rationale",
            ],
            VerdictRiskLevel => &[
                "/preview/verdict/risk_level",
                "/preview/risk_level",
                "/preview/overall_risk",
            ],
            OpportunityCount => &[
                "/preview/opportunity_count",
                "/preview/opportunities_count",
                "/preview/num_opportunities",
            ],
            RiskFactorCount => &["/preview/risk_factor_count", "/preview/risk_count"],
            DataQuality => &[
                "/preview/data_quality/tier",
                "/preview/data_quality_tier",
                "/preview/data_quality",
            ],
            RiskFactors => &["/preview/risk_factors", "/preview/key_risks", "/preview/risks"],
            TotalExposure => &[
                "/preview/total_risk_exposure",
                "/preview/total_exposure",
                "/preview/risk_summary/total_exposure",
                "/preview/exposure_total",
            ],
            TaxComparison => &[
                "/preview/tax_comparison",
                "/preview/tax_rate_comparison",
                "/preview/tax_analysis",
            ],
            WealthProjection => &[
                "/preview/wealth_projection_data",
                "/preview/wealth_projection",
                "/preview/projections",
            ],
            HeirAllocations => &[
                "/preview/heir_allocations",
                "/preview/succession_plan/heirs",
                "/preview/heirs",
            ],
            HeirSummary => &[
                "/preview/heir_summary",
                "/preview/succession_summary",
                "/preview/estate_distribution_summary",
            ],
            SuccessionRiskCurrent => &[
                "/preview/succession_risk/current",
                "/preview/succession_risk_current",
                "/preview/current_succession_risk",
            ],
            SuccessionRiskWithStructure => &[
                "/preview/succession_risk/with_structure",
                "/preview/succession_risk_with_structure",
                "/preview/structured_succession_risk",
            ],
            RegimeImpact => &[
                "/preview/transparency_impact",
                "/preview/regime_impact",
                "/preview/reporting_impact",
            ],
            CrisisResilience => &[
                "/preview/crisis_resilience",
                "/preview/stress_test_results",
                "/preview/crisis_scenarios",
            ],
            DecisionTree => &["/preview/decision_tree", "/preview/decision_scenarios"],
            RealAssetAudit => &[
                "/preview/real_asset_audit",
                "/preview/property_audit",
                "/preview/real_assets",
            ],
            MigrationPrograms => &[
                "/preview/migration_programs",
                "/preview/golden_visa_programs",
                "/preview/residency_programs",
            ],
            HnwiTrends => &[
                "/preview/hnwi_trends",
                "/preview/wealth_migration_trends",
                "/preview/peer_trends",
            ],
            TaxRegimeIntelligence => &[
                "/preview/tax_regime_intelligence",
                "/preview/regime_intelligence",
                "/preview/tax_regimes",
            ],
            PeerCohortSize => &[
                "/preview/peer_cohort_stats/total_hnwis",
                "/preview/peer_cohort_stats/total_peers",
                "/preview/peer_intelligence/cohort_size",
            ],
            PeerCohortNote => &[
                "/preview/peer_cohort_stats/summary",
                "/preview/peer_intelligence/note",
                "/preview/peer_summary",
            ],
            Opportunities => &["/preview/opportunities", "/preview/tax_opportunities"],
            ExecutionSequence => &[
                "/preview/execution_sequence",
                "/preview/action_sequence",
                "/preview/execution_plan",
            ],
            StructuralVerdict => &[
                "/preview/structural_optimization/verdict",
                "/preview/structural_verdict",
                "/preview/via_negativa/verdict",
            ],
            VetoHeadline => &["/preview/via_negativa/headline", "/preview/veto_headline"],
            VetoRationale => &[
                "/preview/via_negativa/rationale",
                "/preview/veto_rationale",
                "/preview/structural_optimization/rationale",
            ],
            VetoTaxEfficiencyPass => &[
                "/preview/via_negativa/tax_efficiency_pass",
                "/preview/veto_gates/tax_efficiency",
            ],
            VetoLiquidityPass => &[
                "/preview/via_negativa/liquidity_pass",
                "/preview/veto_gates/liquidity",
            ],
            VetoStructurePass => &[
                "/preview/via_negativa/structure_pass",
                "/preview/veto_gates/structure",
            ],
            VetoDayOneLossPct => &[
                "/preview/via_negativa/day_one_loss_pct",
                "/preview/day_one_loss_pct",
            ],
            MemoPrecedentCount => &["/memo/precedent_count", "/memo/precedents_analyzed"],
            MemoFailureModeCount => &["/memo/failure_mode_count", "/memo/failure_modes_analyzed"],
            MemoSequencingRuleCount => &["/memo/sequencing_rule_count", "/memo/sequencing_rules"],
        }
    }
}

/// A value counts as absent when it is `null` or an empty string.
#[inline]
fn is_absent(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// First defined, non-empty candidate for `field` in `payload`; no coercion.
pub fn resolve<'a>(payload: &'a Value, field: Field) -> Option<&'a Value> {
    field
        .paths()
        .iter()
        .find_map(|path| payload.pointer(path).filter(|v| !is_absent(v)))
}

/// Resolve + text coercion in one step.
pub fn resolve_text(payload: &Value, field: Field, fallback: &str) -> String {
    match resolve(payload, field) {
        Some(v) => coerce_text(v, fallback),
        None => fallback.to_string(),
    }
}

/// Resolve + numeric coercion in one step.
pub fn resolve_number(payload: &Value, field: Field, fallback: f64) -> f64 {
    match resolve(payload, field) {
        Some(v) => coerce_number(v, fallback),
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newer_alias_wins_over_legacy() {
        let payload = json!({
            "preview": {
                "peer_cohort_stats": { "total_hnwis": 1200, "total_peers": 900 }
            }
        });
        assert_eq!(resolve_number(&payload, Field::PeerCohortSize, 0.0), 1200.0);
    }

    #[test]
    fn legacy_alias_fills_in_when_preferred_is_missing() {
        let payload = json!({
            "preview": { "peer_cohort_stats": { "total_peers": 900 } }
        });
        assert_eq!(resolve_number(&payload, Field::PeerCohortSize, 0.0), 900.0);
    }

    #[test]
    fn empty_strings_do_not_resolve() {
        let payload = json!({
            "preview": {
                "verdict": { "classification": "" },
                "pattern_verdict": "STRUCTURAL_ARBITRAGE"
            }
        });
        assert_eq!(
            resolve_text(&payload, Field::VerdictClassification, "-"),
            "STRUCTURAL_ARBITRAGE"
        );
    }

    #[test]
    fn nested_and_flat_shapes_both_resolve() {
        let nested = json!({ "preview": { "verdict": { "risk_level": "high" } } });
        let flat = json!({ "preview": { "risk_level": "high" } });
        assert_eq!(resolve_text(&nested, Field::VerdictRiskLevel, "-"), "high");
        assert_eq!(resolve_text(&flat, Field::VerdictRiskLevel, "-"), "high");
    }

    #[test]
    fn missing_everything_yields_fallback() {
        let payload = json!({});
        assert!(resolve(&payload, Field::TotalExposure).is_none());
        assert_eq!(resolve_text(&payload, Field::ClientName, "Client"), "Client");
        assert_eq!(resolve_number(&payload, Field::OpportunityCount, 0.0), 0.0);
    }
}
