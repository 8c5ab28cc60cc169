//! crates/pa_core/src/model.rs
//! The canonical report model: fixed, non-optional semantic fields after
//! normalization, consumed by the assembler/renderer.
//!
//! Invariants:
//! - every percentage field is integer points (0–100 for allocations), never
//!   a fraction;
//! - every currency field is a signed raw number in source-currency units —
//!   formatting happens only at render time;
//! - `ViaNegativaState` and the standard verdict narrative are mutually
//!   exclusive: a document never renders both an approval narrative and a
//!   veto stamp.
//!
//! The model is constructed once per report-generation request, read-only
//! afterward, and discarded after the document is produced.

use serde::{Deserialize, Serialize};

// ---------------- Domain enums (closed vocabularies) ----------------

/// Severity tier for a risk factor (and the verdict's overall risk level).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse a wire label; unknown/absent labels degrade to `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" | "severe" => Severity::Critical,
            "high" | "elevated" => Severity::High,
            "low" | "minimal" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Data-quality tier behind the verdict. Ordinal: `Strong > Good > Moderate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
pub enum DataQualityTier {
    Moderate,
    Good,
    Strong,
}

impl DataQualityTier {
    /// Parse a wire label; unknown/absent degrades to `Moderate`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "strong" | "high" => DataQualityTier::Strong,
            "good" => DataQualityTier::Good,
            _ => DataQualityTier::Moderate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataQualityTier::Strong => "Strong",
            DataQualityTier::Good => "Good",
            DataQualityTier::Moderate => "Moderate",
        }
    }
}

/// Action-type tag on a risk factor's mitigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Restructure,
    Insure,
    Relocate,
    Document,
    Monitor,
}

impl ActionType {
    /// Parse a wire tag; unknown tags yield `None` (the tag is optional).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "restructure" | "restructuring" => Some(ActionType::Restructure),
            "insure" | "insurance" => Some(ActionType::Insure),
            "relocate" | "relocation" | "migrate" => Some(ActionType::Relocate),
            "document" | "documentation" => Some(ActionType::Document),
            "monitor" | "monitoring" | "watch" => Some(ActionType::Monitor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Restructure => "restructure",
            ActionType::Insure => "insure",
            ActionType::Relocate => "relocate",
            ActionType::Document => "document",
            ActionType::Monitor => "monitor",
        }
    }
}

/// The three named wealth-projection scenarios.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Base,
    Stress,
    Opportunity,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] =
        [ScenarioKind::Base, ScenarioKind::Stress, ScenarioKind::Opportunity];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Base => "base",
            ScenarioKind::Stress => "stress",
            ScenarioKind::Opportunity => "opportunity",
        }
    }

    /// Probability used when the payload does not carry one.
    pub fn default_probability(&self) -> f64 {
        match self {
            ScenarioKind::Base => 0.55,
            ScenarioKind::Stress => 0.25,
            ScenarioKind::Opportunity => 0.20,
        }
    }
}

/// Upstream structural-optimization verdict, parsed once from the wire
/// sentinel strings so the veto and non-veto paths are statically
/// distinguished (no string equality scattered through the renderer).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralVerdict {
    Proceed,
    ProceedWithCaution,
    DoNotProceed,
}

impl StructuralVerdict {
    /// Parse the wire sentinel. Unknown or absent values must not
    /// accidentally trip the veto, so they resolve to `Proceed`.
    pub fn from_sentinel(s: &str) -> Self {
        let norm = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "DO_NOT_PROCEED" | "VETO" | "REJECTED" => StructuralVerdict::DoNotProceed,
            "PROCEED_WITH_CAUTION" | "CAUTION" => StructuralVerdict::ProceedWithCaution,
            _ => StructuralVerdict::Proceed,
        }
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, StructuralVerdict::DoNotProceed)
    }
}

// ---------------- Verdict & risk ----------------

/// Headline decision block.
#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Verdict {
    pub classification: String,
    pub rationale: String,
    pub risk_level: Severity,
    pub opportunity_count: u32,
    pub risk_factor_count: u32,
    pub data_quality: DataQualityTier,
}

/// One normalized risk-factor row.
#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct RiskFactor {
    pub title: String,
    pub severity: Severity,
    /// Raw amount in source-currency units (0.0 when unrecoverable).
    pub exposure: f64,
    /// The payload's display string for the exposure, when it had one.
    pub exposure_display: Option<String>,
    pub mitigation: String,
    pub timeline_days: Option<u32>,
    pub action: Option<ActionType>,
}

// ---------------- Tax ----------------

/// Per-jurisdiction rate table, integer percent points.
#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct JurisdictionRates {
    pub name: String,
    pub income: i64,
    pub capital_gains: i64,
    pub estate: i64,
    pub wealth: i64,
}

impl JurisdictionRates {
    /// The fixed category list summed by the cumulative differential.
    pub fn total_points(&self) -> i64 {
        self.income + self.capital_gains + self.estate + self.wealth
    }
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct TaxComparison {
    pub source: JurisdictionRates,
    pub destination: JurisdictionRates,
    /// Σ (source − destination) across the four categories.
    /// Positive = savings (rendered with a leading `+`).
    pub differential_points: i64,
}

// ---------------- Wealth projection ----------------

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub probability: f64,
    pub ten_year_value: f64,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct WealthProjection {
    pub starting_value: f64,
    /// The labeled triple (base/stress/opportunity); never summed here —
    /// the rendering layer tabulates it.
    pub scenarios: Vec<Scenario>,
    /// Cost-of-inaction series keyed by year offset.
    pub cost_of_inaction: Vec<(u32, f64)>,
}

impl WealthProjection {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }
}

// ---------------- Succession & heirs ----------------

#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct SuccessionRisk {
    pub current_pct: i64,
    pub with_structure_pct: i64,
    /// `current − with_structure`; positive = improvement.
    pub improvement_points: i64,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct HeirAllocation {
    pub name: String,
    pub relationship: String,
    /// Always 0–100 integer, regardless of whether the source used a 0–1
    /// fraction or points.
    pub allocation_pct: u8,
    pub allocation_value: f64,
    pub structure: String,
}

// ---------------- Via-negativa veto overlay ----------------

/// Present only when the structural-viability gate fails. Carries the three
/// independent pass/fail checks plus veto-specific copy.
#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct ViaNegativaState {
    pub tax_efficiency_pass: bool,
    pub liquidity_pass: bool,
    pub structure_pass: bool,
    pub headline: String,
    pub rationale: String,
}

// ---------------- Light section models ----------------

/// Regime-impact / transparency section (two historical payload shapes).
#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct TransparencyImpact {
    pub headline: String,
    pub triggers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct CrisisScenario {
    pub name: String,
    pub impact: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct CrisisResilience {
    pub overall: Option<String>,
    pub scenarios: Vec<CrisisScenario>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct DecisionBranch {
    pub label: String,
    pub outcome: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct DecisionGate {
    pub label: String,
    pub pass: bool,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct DecisionTree {
    pub branches: Vec<DecisionBranch>,
    pub gates: Vec<DecisionGate>,
}

/// One jurisdiction's real-asset findings; only rows with at least one
/// non-empty field survive normalization.
#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct JurisdictionAudit {
    pub jurisdiction: String,
    pub stamp_duty: Option<String>,
    pub loophole: Option<String>,
    pub trust: Option<String>,
    pub succession_vehicle: Option<String>,
    pub freeport: Option<String>,
}

impl JurisdictionAudit {
    pub fn has_content(&self) -> bool {
        [&self.stamp_duty, &self.loophole, &self.trust, &self.succession_vehicle, &self.freeport]
            .iter()
            .any(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct MigrationProgram {
    pub name: String,
    pub jurisdiction: String,
    pub min_investment: f64,
    pub timeline: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct HnwiTrend {
    pub label: String,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct TaxRegimeNote {
    pub jurisdiction: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[derive(Serialize, Deserialize)]
pub struct PeerIntelligence {
    /// Cohort size (`total_hnwis`, with `total_peers` as the legacy alias).
    pub cohort_size: u64,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Opportunity {
    pub title: String,
    pub upside: f64,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct ExecutionStep {
    pub order: u32,
    pub action: String,
    pub timeline: String,
}

/// Intelligence provenance counters from the payload's "memo" region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize)]
pub struct ProvenanceCounters {
    pub precedents: u64,
    pub failure_modes: u64,
    pub sequencing_rules: u64,
}

// ---------------- Root aggregate ----------------

/// The fully normalized, render-ready model. One per request; read-only.
#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct CanonicalReport {
    pub client_name: String,
    pub verdict: Verdict,
    pub structural_verdict: StructuralVerdict,
    /// Present iff `structural_verdict.is_veto()`.
    pub veto: Option<ViaNegativaState>,
    pub provenance: ProvenanceCounters,

    pub risk_factors: Vec<RiskFactor>,
    /// Derived total risk exposure (raw currency units).
    pub total_exposure: f64,

    pub tax: Option<TaxComparison>,
    pub projection: WealthProjection,
    pub succession: SuccessionRisk,
    pub heirs: Vec<HeirAllocation>,
    /// True when any legacy heir summary field was observed, even with an
    /// empty allocation list.
    pub heir_summary_present: bool,

    pub transparency: Option<TransparencyImpact>,
    pub crisis: CrisisResilience,
    pub decision_tree: DecisionTree,
    pub real_assets: Vec<JurisdictionAudit>,
    pub migration_programs: Vec<MigrationProgram>,
    pub hnwi_trends: Vec<HnwiTrend>,
    pub tax_regimes: Vec<TaxRegimeNote>,
    pub peers: PeerIntelligence,
    pub opportunities: Vec<Opportunity>,
    pub execution_sequence: Vec<ExecutionStep>,
}
