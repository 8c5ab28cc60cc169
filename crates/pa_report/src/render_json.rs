//! crates/pa_report/src/render_json.rs
//! JSON renderer over the assembled page list.
//!
//! Output contract:
//! - object key order is insertion order (`preserve_order`), so the same page
//!   list always serializes to the same bytes;
//! - every raw currency value is emitted twice: the raw number under its own
//!   key and a `*_display` companion from `pa_core::format`;
//! - percent points are emitted raw plus a signed `*_display` companion.

use serde_json::{json, Map, Value};

use pa_core::format::{format_currency, signed_percent_points};
use pa_core::model::{RiskFactor, Scenario};

use crate::{
    ClosingSummaryPage, CoverPage, CrisisResiliencePage, DecisionTreePage, ExecutionSequencePage,
    HeirManagementPage, HnwiTrendsPage, LegalClosingPage, MigrationProgramsPage,
    OpportunitiesPage, PageDescriptor, PatternSummaryPage, PeerIntelligencePage,
    RealAssetAuditPage, TaxAnalysisPage, TaxRegimeIntelligencePage, TransparencyPage,
    VerdictPage, VetoVerdictPage, WealthProjectionPage,
};

/// Render the assembled page list to the final document value.
pub fn render_document_json(pages: &[PageDescriptor]) -> Value {
    let rendered: Vec<Value> = pages.iter().map(page_json).collect();
    let mut doc = Map::new();
    doc.insert("pages".into(), Value::Array(rendered));
    doc.insert("page_count".into(), json!(pages.len()));
    Value::Object(doc)
}

fn page_json(page: &PageDescriptor) -> Value {
    let mut obj = Map::new();
    obj.insert("kind".into(), json!(page.kind().as_str()));
    match page {
        PageDescriptor::Cover(p) => cover_json(&mut obj, p),
        PageDescriptor::PatternSummary(p) => pattern_summary_json(&mut obj, p),
        PageDescriptor::Verdict(p) => verdict_json(&mut obj, p),
        PageDescriptor::VetoVerdict(p) => veto_verdict_json(&mut obj, p),
        PageDescriptor::TaxAnalysis(p) => tax_analysis_json(&mut obj, p),
        PageDescriptor::WealthProjection(p) => wealth_projection_json(&mut obj, p),
        PageDescriptor::PeerIntelligence(p) => peer_intelligence_json(&mut obj, p),
        PageDescriptor::Opportunities(p) => opportunities_json(&mut obj, p),
        PageDescriptor::ExecutionSequence(p) => execution_sequence_json(&mut obj, p),
        PageDescriptor::Transparency(p) => transparency_json(&mut obj, p),
        PageDescriptor::RealAssetAudit(p) => real_asset_audit_json(&mut obj, p),
        PageDescriptor::MigrationPrograms(p) => migration_programs_json(&mut obj, p),
        PageDescriptor::HnwiTrends(p) => hnwi_trends_json(&mut obj, p),
        PageDescriptor::TaxRegimeIntelligence(p) => tax_regimes_json(&mut obj, p),
        PageDescriptor::CrisisResilience(p) => crisis_json(&mut obj, p),
        PageDescriptor::DecisionTree(p) => decision_tree_json(&mut obj, p),
        PageDescriptor::HeirManagement(p) => heir_management_json(&mut obj, p),
        PageDescriptor::ClosingSummary(p) => closing_summary_json(&mut obj, p),
        PageDescriptor::LegalClosing(p) => legal_closing_json(&mut obj, p),
    }
    Value::Object(obj)
}

// -------------------- Per-page renderers --------------------

fn cover_json(obj: &mut Map<String, Value>, p: &CoverPage) {
    obj.insert("client_name".into(), json!(p.client_name));
    obj.insert("classification".into(), json!(p.classification));
    obj.insert("data_quality".into(), json!(p.data_quality));
}

fn pattern_summary_json(obj: &mut Map<String, Value>, p: &PatternSummaryPage) {
    obj.insert("precedents".into(), json!(p.provenance.precedents));
    obj.insert("failure_modes".into(), json!(p.provenance.failure_modes));
    obj.insert("sequencing_rules".into(), json!(p.provenance.sequencing_rules));
    obj.insert("risk_factor_count".into(), json!(p.risk_factor_count));
    obj.insert("opportunity_count".into(), json!(p.opportunity_count));
    insert_currency(obj, "total_exposure", p.total_exposure);
}

fn verdict_json(obj: &mut Map<String, Value>, p: &VerdictPage) {
    obj.insert("classification".into(), json!(p.verdict.classification));
    obj.insert("rationale".into(), json!(p.verdict.rationale));
    obj.insert("risk_level".into(), json!(p.verdict.risk_level.as_str()));
    obj.insert("data_quality".into(), json!(p.verdict.data_quality.as_str()));
    insert_currency(obj, "total_exposure", p.total_exposure);
    obj.insert("risk_factors".into(), risk_factors_json(&p.risk_factors));
}

fn veto_verdict_json(obj: &mut Map<String, Value>, p: &VetoVerdictPage) {
    obj.insert("stamp".into(), json!(p.stamp));
    obj.insert("headline".into(), json!(p.state.headline));
    obj.insert("rationale".into(), json!(p.state.rationale));
    let mut gates = Map::new();
    gates.insert("tax_efficiency_pass".into(), json!(p.state.tax_efficiency_pass));
    gates.insert("liquidity_pass".into(), json!(p.state.liquidity_pass));
    gates.insert("structure_pass".into(), json!(p.state.structure_pass));
    obj.insert("gates".into(), Value::Object(gates));
    obj.insert("risk_factors".into(), risk_factors_json(&p.risk_factors));
}

fn tax_analysis_json(obj: &mut Map<String, Value>, p: &TaxAnalysisPage) {
    match &p.tax {
        Some(tax) => {
            obj.insert("source".into(), rates_json(&tax.source));
            obj.insert("destination".into(), rates_json(&tax.destination));
            obj.insert("differential_points".into(), json!(tax.differential_points));
            obj.insert(
                "differential_display".into(),
                json!(signed_percent_points(tax.differential_points)),
            );
        }
        // The page is mandatory; without data it renders the placeholder.
        None => {
            obj.insert("available".into(), json!(false));
        }
    }
}

fn rates_json(r: &pa_core::model::JurisdictionRates) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), json!(r.name));
    obj.insert("income".into(), json!(r.income));
    obj.insert("capital_gains".into(), json!(r.capital_gains));
    obj.insert("estate".into(), json!(r.estate));
    obj.insert("wealth".into(), json!(r.wealth));
    obj.insert("total_points".into(), json!(r.total_points()));
    Value::Object(obj)
}

fn wealth_projection_json(obj: &mut Map<String, Value>, p: &WealthProjectionPage) {
    insert_currency(obj, "starting_value", p.projection.starting_value);
    let scenarios: Vec<Value> = p.projection.scenarios.iter().map(scenario_json).collect();
    obj.insert("scenarios".into(), Value::Array(scenarios));
    let inaction: Vec<Value> = p
        .projection
        .cost_of_inaction
        .iter()
        .map(|(year, cost)| {
            let mut row = Map::new();
            row.insert("year".into(), json!(year));
            row.insert("cost".into(), json!(cost));
            row.insert("cost_display".into(), json!(format_currency(*cost)));
            Value::Object(row)
        })
        .collect();
    obj.insert("cost_of_inaction".into(), Value::Array(inaction));
}

fn scenario_json(s: &Scenario) -> Value {
    let mut obj = Map::new();
    obj.insert("kind".into(), json!(s.kind.as_str()));
    obj.insert("probability".into(), json!(s.probability));
    obj.insert("ten_year_value".into(), json!(s.ten_year_value));
    obj.insert("ten_year_display".into(), json!(format_currency(s.ten_year_value)));
    Value::Object(obj)
}

fn peer_intelligence_json(obj: &mut Map<String, Value>, p: &PeerIntelligencePage) {
    obj.insert("cohort_size".into(), json!(p.peers.cohort_size));
    obj.insert("note".into(), json!(p.peers.note));
}

fn opportunities_json(obj: &mut Map<String, Value>, p: &OpportunitiesPage) {
    let items: Vec<Value> = p
        .items
        .iter()
        .map(|o| {
            let mut row = Map::new();
            row.insert("title".into(), json!(o.title));
            insert_currency(&mut row, "upside", o.upside);
            row.insert("note".into(), json!(o.note));
            Value::Object(row)
        })
        .collect();
    obj.insert("items".into(), Value::Array(items));
}

fn execution_sequence_json(obj: &mut Map<String, Value>, p: &ExecutionSequencePage) {
    let steps: Vec<Value> = p
        .steps
        .iter()
        .map(|s| {
            let mut row = Map::new();
            row.insert("order".into(), json!(s.order));
            row.insert("action".into(), json!(s.action));
            row.insert("timeline".into(), json!(s.timeline));
            Value::Object(row)
        })
        .collect();
    obj.insert("steps".into(), Value::Array(steps));
}

fn transparency_json(obj: &mut Map<String, Value>, p: &TransparencyPage) {
    obj.insert("headline".into(), json!(p.impact.headline));
    obj.insert("triggers".into(), json!(p.impact.triggers));
}

fn real_asset_audit_json(obj: &mut Map<String, Value>, p: &RealAssetAuditPage) {
    let rows: Vec<Value> = p
        .jurisdictions
        .iter()
        .map(|j| {
            let mut row = Map::new();
            row.insert("jurisdiction".into(), json!(j.jurisdiction));
            insert_opt(&mut row, "stamp_duty", &j.stamp_duty);
            insert_opt(&mut row, "loophole", &j.loophole);
            insert_opt(&mut row, "trust", &j.trust);
            insert_opt(&mut row, "succession_vehicle", &j.succession_vehicle);
            insert_opt(&mut row, "freeport", &j.freeport);
            Value::Object(row)
        })
        .collect();
    obj.insert("jurisdictions".into(), Value::Array(rows));
}

fn migration_programs_json(obj: &mut Map<String, Value>, p: &MigrationProgramsPage) {
    let rows: Vec<Value> = p
        .programs
        .iter()
        .map(|m| {
            let mut row = Map::new();
            row.insert("name".into(), json!(m.name));
            row.insert("jurisdiction".into(), json!(m.jurisdiction));
            insert_currency(&mut row, "min_investment", m.min_investment);
            row.insert("timeline".into(), json!(m.timeline));
            Value::Object(row)
        })
        .collect();
    obj.insert("programs".into(), Value::Array(rows));
}

fn hnwi_trends_json(obj: &mut Map<String, Value>, p: &HnwiTrendsPage) {
    let rows: Vec<Value> = p
        .trends
        .iter()
        .map(|t| {
            let mut row = Map::new();
            row.insert("label".into(), json!(t.label));
            row.insert("note".into(), json!(t.note));
            Value::Object(row)
        })
        .collect();
    obj.insert("trends".into(), Value::Array(rows));
}

fn tax_regimes_json(obj: &mut Map<String, Value>, p: &TaxRegimeIntelligencePage) {
    let rows: Vec<Value> = p
        .regimes
        .iter()
        .map(|r| {
            let mut row = Map::new();
            row.insert("jurisdiction".into(), json!(r.jurisdiction));
            row.insert("summary".into(), json!(r.summary));
            Value::Object(row)
        })
        .collect();
    obj.insert("regimes".into(), Value::Array(rows));
}

fn crisis_json(obj: &mut Map<String, Value>, p: &CrisisResiliencePage) {
    match &p.crisis.overall {
        Some(overall) => obj.insert("overall".into(), json!(overall)),
        None => obj.insert("overall".into(), Value::Null),
    };
    let rows: Vec<Value> = p
        .crisis
        .scenarios
        .iter()
        .map(|s| {
            let mut row = Map::new();
            row.insert("name".into(), json!(s.name));
            row.insert("impact".into(), json!(s.impact));
            Value::Object(row)
        })
        .collect();
    obj.insert("scenarios".into(), Value::Array(rows));
}

fn decision_tree_json(obj: &mut Map<String, Value>, p: &DecisionTreePage) {
    let branches: Vec<Value> = p
        .tree
        .branches
        .iter()
        .map(|b| {
            let mut row = Map::new();
            row.insert("label".into(), json!(b.label));
            row.insert("outcome".into(), json!(b.outcome));
            Value::Object(row)
        })
        .collect();
    obj.insert("branches".into(), Value::Array(branches));
    let gates: Vec<Value> = p
        .tree
        .gates
        .iter()
        .map(|g| {
            let mut row = Map::new();
            row.insert("label".into(), json!(g.label));
            row.insert("pass".into(), json!(g.pass));
            Value::Object(row)
        })
        .collect();
    obj.insert("gates".into(), Value::Array(gates));
}

fn heir_management_json(obj: &mut Map<String, Value>, p: &HeirManagementPage) {
    let rows: Vec<Value> = p
        .heirs
        .iter()
        .map(|h| {
            let mut row = Map::new();
            row.insert("name".into(), json!(h.name));
            row.insert("relationship".into(), json!(h.relationship));
            row.insert("allocation_pct".into(), json!(h.allocation_pct));
            insert_currency(&mut row, "allocation_value", h.allocation_value);
            row.insert("structure".into(), json!(h.structure));
            Value::Object(row)
        })
        .collect();
    obj.insert("heirs".into(), Value::Array(rows));
    let mut succession = Map::new();
    succession.insert("current_pct".into(), json!(p.succession.current_pct));
    succession.insert("with_structure_pct".into(), json!(p.succession.with_structure_pct));
    succession.insert("improvement_points".into(), json!(p.succession.improvement_points));
    succession.insert(
        "improvement_display".into(),
        json!(signed_percent_points(p.succession.improvement_points)),
    );
    obj.insert("succession".into(), Value::Object(succession));
}

fn closing_summary_json(obj: &mut Map<String, Value>, p: &ClosingSummaryPage) {
    obj.insert("classification".into(), json!(p.classification));
    insert_currency(obj, "total_exposure", p.total_exposure);
    match p.differential_points {
        Some(points) => {
            obj.insert("differential_points".into(), json!(points));
            obj.insert("differential_display".into(), json!(signed_percent_points(points)));
        }
        None => {
            obj.insert("differential_points".into(), Value::Null);
        }
    }
    obj.insert("improvement_points".into(), json!(p.improvement_points));
    obj.insert(
        "improvement_display".into(),
        json!(signed_percent_points(p.improvement_points)),
    );
    obj.insert("vetoed".into(), json!(p.vetoed));
}

fn legal_closing_json(obj: &mut Map<String, Value>, p: &LegalClosingPage) {
    obj.insert("client_name".into(), json!(p.client_name));
    obj.insert("notice".into(), json!(p.notice));
}

// -------------------- Shared fragments --------------------

fn risk_factors_json(items: &[RiskFactor]) -> Value {
    let rows: Vec<Value> = items
        .iter()
        .map(|f| {
            let mut row = Map::new();
            row.insert("title".into(), json!(f.title));
            row.insert("severity".into(), json!(f.severity.as_str()));
            row.insert("exposure".into(), json!(f.exposure));
            // Keep the payload's own display string when it had one.
            let display = f
                .exposure_display
                .clone()
                .unwrap_or_else(|| format_currency(f.exposure));
            row.insert("exposure_display".into(), json!(display));
            row.insert("mitigation".into(), json!(f.mitigation));
            match f.timeline_days {
                Some(days) => row.insert("timeline_days".into(), json!(days)),
                None => row.insert("timeline_days".into(), Value::Null),
            };
            if let Some(action) = f.action {
                row.insert("action".into(), json!(action.as_str()));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn insert_currency(obj: &mut Map<String, Value>, key: &str, amount: f64) {
    obj.insert(key.into(), json!(amount));
    obj.insert(format!("{key}_display"), json!(format_currency(amount)));
}

fn insert_opt(obj: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    match value {
        Some(s) if !s.is_empty() => obj.insert(key.into(), json!(s)),
        _ => obj.insert(key.into(), Value::Null),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, PageKind};
    use assert_json_diff::assert_json_include;
    use pa_core::model::*;
    use pa_metrics::inclusion::SectionSet;

    fn report() -> CanonicalReport {
        CanonicalReport {
            client_name: "A. Client".into(),
            verdict: Verdict {
                classification: "STRUCTURAL_ARBITRAGE".into(),
                rationale: "favorable differential".into(),
                risk_level: Severity::High,
                opportunity_count: 1,
                risk_factor_count: 1,
                data_quality: DataQualityTier::Good,
            },
            structural_verdict: StructuralVerdict::Proceed,
            veto: None,
            provenance: ProvenanceCounters { precedents: 7, failure_modes: 2, sequencing_rules: 1 },
            risk_factors: vec![RiskFactor {
                title: "ABSD exposure".into(),
                severity: Severity::High,
                exposure: 2_700_000.0,
                exposure_display: Some("60% of property value = $2,700,000".into()),
                mitigation: "Restructure holding entity".into(),
                timeline_days: Some(90),
                action: Some(ActionType::Restructure),
            }],
            total_exposure: 2_700_000.0,
            tax: Some(TaxComparison {
                source: JurisdictionRates {
                    name: "UK".into(),
                    income: 45,
                    capital_gains: 20,
                    estate: 40,
                    wealth: 0,
                },
                destination: JurisdictionRates {
                    name: "SG".into(),
                    income: 22,
                    capital_gains: 0,
                    estate: 0,
                    wealth: 0,
                },
                differential_points: 83,
            }),
            projection: WealthProjection::default(),
            succession: SuccessionRisk { current_pct: 35, with_structure_pct: 12, improvement_points: 23 },
            heirs: Vec::new(),
            heir_summary_present: false,
            transparency: None,
            crisis: CrisisResilience::default(),
            decision_tree: DecisionTree::default(),
            real_assets: Vec::new(),
            migration_programs: Vec::new(),
            hnwi_trends: Vec::new(),
            tax_regimes: Vec::new(),
            peers: PeerIntelligence { cohort_size: 1_200, note: "UHNW cohort".into() },
            opportunities: Vec::new(),
            execution_sequence: Vec::new(),
        }
    }

    #[test]
    fn document_carries_page_count_and_kinds() {
        let report = report();
        let sections = SectionSet::evaluate(&report);
        let pages = assemble(&report, &sections);
        let doc = render_document_json(&pages);
        assert_eq!(doc["page_count"], serde_json::json!(pages.len()));
        assert_eq!(doc["pages"][0]["kind"], serde_json::json!("cover"));
        assert_eq!(
            doc["pages"][pages.len() - 1]["kind"],
            serde_json::json!(PageKind::LegalClosing.as_str())
        );
    }

    #[test]
    fn currency_fields_carry_display_companions() {
        let report = report();
        let sections = SectionSet::evaluate(&report);
        let doc = render_document_json(&assemble(&report, &sections));
        assert_json_include!(
            actual: doc["pages"][1].clone(),
            expected: serde_json::json!({
                "kind": "pattern_summary",
                "total_exposure": 2_700_000.0,
                "total_exposure_display": "$2.70M"
            })
        );
    }

    #[test]
    fn verdict_keeps_payload_exposure_display() {
        let report = report();
        let sections = SectionSet::evaluate(&report);
        let doc = render_document_json(&assemble(&report, &sections));
        assert_eq!(
            doc["pages"][2]["risk_factors"][0]["exposure_display"],
            serde_json::json!("60% of property value = $2,700,000")
        );
    }

    #[test]
    fn tax_page_renders_signed_differential() {
        let report = report();
        let sections = SectionSet::evaluate(&report);
        let doc = render_document_json(&assemble(&report, &sections));
        assert_json_include!(
            actual: doc["pages"][3].clone(),
            expected: serde_json::json!({
                "kind": "tax_analysis",
                "differential_points": 83,
                "differential_display": "+83%"
            })
        );
    }

    #[test]
    fn rendering_is_byte_stable() {
        let report = report();
        let sections = SectionSet::evaluate(&report);
        let pages = assemble(&report, &sections);
        let a = serde_json::to_string(&render_document_json(&pages)).unwrap();
        let b = serde_json::to_string(&render_document_json(&pages)).unwrap();
        assert_eq!(a, b);
    }
}
