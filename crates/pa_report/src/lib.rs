//! pa_report — Pure offline document assembler + JSON renderer.
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply the canonical model already
//!   in-memory.
//! - Fixed page order; pages whose inclusion predicate is false are omitted
//!   entirely rather than rendered empty.
//! - Currency/percent display strings come from `pa_core::format` only, so
//!   the renderer cannot drift from the formatting layer.
//!
//! Assembly is a single deterministic pass with no backtracking:
//! re-assembling the same model yields the same page list.

#![deny(unsafe_code)]

use pa_core::model::{
    CanonicalReport, CrisisResilience, DecisionTree, HeirAllocation, JurisdictionAudit,
    ProvenanceCounters, SuccessionRisk, TaxComparison, TransparencyImpact, Verdict,
    ViaNegativaState, WealthProjection,
};
use pa_metrics::inclusion::SectionSet;

// Re-export the display helpers (handy for other crates); the renderer is the
// only place they are applied to model values.
pub use pa_core::format::{format_currency, signed_percent_points};

mod render_json;
pub use render_json::render_document_json;

/// Page kinds in document order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PageKind {
    Cover,
    PatternSummary,
    Verdict,
    VetoVerdict,
    TaxAnalysis,
    WealthProjection,
    PeerIntelligence,
    Opportunities,
    ExecutionSequence,
    Transparency,
    RealAssetAudit,
    MigrationPrograms,
    HnwiTrends,
    TaxRegimeIntelligence,
    CrisisResilience,
    DecisionTree,
    HeirManagement,
    ClosingSummary,
    LegalClosing,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Cover => "cover",
            PageKind::PatternSummary => "pattern_summary",
            PageKind::Verdict => "verdict",
            PageKind::VetoVerdict => "veto_verdict",
            PageKind::TaxAnalysis => "tax_analysis",
            PageKind::WealthProjection => "wealth_projection",
            PageKind::PeerIntelligence => "peer_intelligence",
            PageKind::Opportunities => "opportunities",
            PageKind::ExecutionSequence => "execution_sequence",
            PageKind::Transparency => "transparency",
            PageKind::RealAssetAudit => "real_asset_audit",
            PageKind::MigrationPrograms => "migration_programs",
            PageKind::HnwiTrends => "hnwi_trends",
            PageKind::TaxRegimeIntelligence => "tax_regime_intelligence",
            PageKind::CrisisResilience => "crisis_resilience",
            PageKind::DecisionTree => "decision_tree",
            PageKind::HeirManagement => "heir_management",
            PageKind::ClosingSummary => "closing_summary",
            PageKind::LegalClosing => "legal_closing",
        }
    }
}

// -------------------- Page sub-models (render-ready) --------------------

#[derive(Clone, Debug)]
pub struct CoverPage {
    pub client_name: String,
    pub classification: String,
    pub data_quality: String,
}

#[derive(Clone, Debug)]
pub struct PatternSummaryPage {
    pub provenance: ProvenanceCounters,
    pub risk_factor_count: u32,
    pub opportunity_count: u32,
    pub total_exposure: f64,
}

#[derive(Clone, Debug)]
pub struct VerdictPage {
    pub verdict: Verdict,
    pub total_exposure: f64,
    pub risk_factors: Vec<pa_core::model::RiskFactor>,
}

/// The re-skinned verdict used when the structural gate failed: different
/// header, badge, and stamp copy; the approval narrative never appears.
#[derive(Clone, Debug)]
pub struct VetoVerdictPage {
    pub state: ViaNegativaState,
    pub stamp: &'static str,
    pub risk_factors: Vec<pa_core::model::RiskFactor>,
}

#[derive(Clone, Debug)]
pub struct TaxAnalysisPage {
    pub tax: Option<TaxComparison>,
}

#[derive(Clone, Debug)]
pub struct WealthProjectionPage {
    pub projection: WealthProjection,
}

#[derive(Clone, Debug)]
pub struct PeerIntelligencePage {
    pub peers: pa_core::model::PeerIntelligence,
}

#[derive(Clone, Debug)]
pub struct OpportunitiesPage {
    pub items: Vec<pa_core::model::Opportunity>,
}

#[derive(Clone, Debug)]
pub struct ExecutionSequencePage {
    pub steps: Vec<pa_core::model::ExecutionStep>,
}

#[derive(Clone, Debug)]
pub struct TransparencyPage {
    pub impact: TransparencyImpact,
}

#[derive(Clone, Debug)]
pub struct RealAssetAuditPage {
    pub jurisdictions: Vec<JurisdictionAudit>,
}

#[derive(Clone, Debug)]
pub struct MigrationProgramsPage {
    pub programs: Vec<pa_core::model::MigrationProgram>,
}

#[derive(Clone, Debug)]
pub struct HnwiTrendsPage {
    pub trends: Vec<pa_core::model::HnwiTrend>,
}

#[derive(Clone, Debug)]
pub struct TaxRegimeIntelligencePage {
    pub regimes: Vec<pa_core::model::TaxRegimeNote>,
}

#[derive(Clone, Debug)]
pub struct CrisisResiliencePage {
    pub crisis: CrisisResilience,
}

#[derive(Clone, Debug)]
pub struct DecisionTreePage {
    pub tree: DecisionTree,
}

#[derive(Clone, Debug)]
pub struct HeirManagementPage {
    pub heirs: Vec<HeirAllocation>,
    pub succession: SuccessionRisk,
}

#[derive(Clone, Debug)]
pub struct ClosingSummaryPage {
    pub classification: String,
    pub total_exposure: f64,
    pub differential_points: Option<i64>,
    pub improvement_points: i64,
    pub vetoed: bool,
}

#[derive(Clone, Debug)]
pub struct LegalClosingPage {
    pub client_name: String,
    pub notice: &'static str,
}

/// Confidentiality boilerplate on the final page.
pub const CONFIDENTIALITY_NOTICE: &str =
    "This document is confidential, prepared exclusively for the named client, \
     and is not investment, legal, or tax advice.";

/// Stamp text on the veto verdict variant.
pub const VETO_STAMP: &str = "DO NOT PROCEED";

/// One assembled page: kind + its normalized sub-model.
#[derive(Clone, Debug)]
pub enum PageDescriptor {
    Cover(CoverPage),
    PatternSummary(PatternSummaryPage),
    Verdict(VerdictPage),
    VetoVerdict(VetoVerdictPage),
    TaxAnalysis(TaxAnalysisPage),
    WealthProjection(WealthProjectionPage),
    PeerIntelligence(PeerIntelligencePage),
    Opportunities(OpportunitiesPage),
    ExecutionSequence(ExecutionSequencePage),
    Transparency(TransparencyPage),
    RealAssetAudit(RealAssetAuditPage),
    MigrationPrograms(MigrationProgramsPage),
    HnwiTrends(HnwiTrendsPage),
    TaxRegimeIntelligence(TaxRegimeIntelligencePage),
    CrisisResilience(CrisisResiliencePage),
    DecisionTree(DecisionTreePage),
    HeirManagement(HeirManagementPage),
    ClosingSummary(ClosingSummaryPage),
    LegalClosing(LegalClosingPage),
}

impl PageDescriptor {
    pub fn kind(&self) -> PageKind {
        match self {
            PageDescriptor::Cover(_) => PageKind::Cover,
            PageDescriptor::PatternSummary(_) => PageKind::PatternSummary,
            PageDescriptor::Verdict(_) => PageKind::Verdict,
            PageDescriptor::VetoVerdict(_) => PageKind::VetoVerdict,
            PageDescriptor::TaxAnalysis(_) => PageKind::TaxAnalysis,
            PageDescriptor::WealthProjection(_) => PageKind::WealthProjection,
            PageDescriptor::PeerIntelligence(_) => PageKind::PeerIntelligence,
            PageDescriptor::Opportunities(_) => PageKind::Opportunities,
            PageDescriptor::ExecutionSequence(_) => PageKind::ExecutionSequence,
            PageDescriptor::Transparency(_) => PageKind::Transparency,
            PageDescriptor::RealAssetAudit(_) => PageKind::RealAssetAudit,
            PageDescriptor::MigrationPrograms(_) => PageKind::MigrationPrograms,
            PageDescriptor::HnwiTrends(_) => PageKind::HnwiTrends,
            PageDescriptor::TaxRegimeIntelligence(_) => PageKind::TaxRegimeIntelligence,
            PageDescriptor::CrisisResilience(_) => PageKind::CrisisResilience,
            PageDescriptor::DecisionTree(_) => PageKind::DecisionTree,
            PageDescriptor::HeirManagement(_) => PageKind::HeirManagement,
            PageDescriptor::ClosingSummary(_) => PageKind::ClosingSummary,
            PageDescriptor::LegalClosing(_) => PageKind::LegalClosing,
        }
    }
}

// -------------------- Assembly entrypoint --------------------

/// Order the included sections into the linear page sequence.
///
/// Fixed order: cover → pattern summary → verdict (or veto variant) → tax
/// analysis (+ wealth projection) → peer intelligence (+ opportunities,
/// execution sequence, transparency) → real-asset audit → migration programs
/// → HNWI trends → tax-regime intelligence → crisis resilience → decision
/// tree → heir management → closing summary → legal closing.
pub fn assemble(report: &CanonicalReport, sections: &SectionSet) -> Vec<PageDescriptor> {
    let mut pages: Vec<PageDescriptor> = Vec::new();

    pages.push(PageDescriptor::Cover(CoverPage {
        client_name: report.client_name.clone(),
        classification: report.verdict.classification.clone(),
        data_quality: report.verdict.data_quality.as_str().to_string(),
    }));

    pages.push(PageDescriptor::PatternSummary(PatternSummaryPage {
        provenance: report.provenance,
        risk_factor_count: report.verdict.risk_factor_count,
        opportunity_count: report.verdict.opportunity_count,
        total_exposure: report.total_exposure,
    }));

    // Verdict XOR veto: a document never carries both narratives.
    if sections.veto {
        let state = report.veto.clone().unwrap_or(ViaNegativaState {
            tax_efficiency_pass: false,
            liquidity_pass: false,
            structure_pass: false,
            headline: "Structure vetoed".to_string(),
            rationale: "Structural viability gate failed".to_string(),
        });
        pages.push(PageDescriptor::VetoVerdict(VetoVerdictPage {
            state,
            stamp: VETO_STAMP,
            risk_factors: report.risk_factors.clone(),
        }));
    } else {
        pages.push(PageDescriptor::Verdict(VerdictPage {
            verdict: report.verdict.clone(),
            total_exposure: report.total_exposure,
            risk_factors: report.risk_factors.clone(),
        }));
    }

    pages.push(PageDescriptor::TaxAnalysis(TaxAnalysisPage { tax: report.tax.clone() }));

    if sections.wealth_projection {
        pages.push(PageDescriptor::WealthProjection(WealthProjectionPage {
            projection: report.projection.clone(),
        }));
    }

    pages.push(PageDescriptor::PeerIntelligence(PeerIntelligencePage {
        peers: report.peers.clone(),
    }));

    if sections.opportunities {
        pages.push(PageDescriptor::Opportunities(OpportunitiesPage {
            items: report.opportunities.clone(),
        }));
    }
    if sections.execution_sequence {
        pages.push(PageDescriptor::ExecutionSequence(ExecutionSequencePage {
            steps: report.execution_sequence.clone(),
        }));
    }
    if sections.transparency {
        if let Some(impact) = &report.transparency {
            pages.push(PageDescriptor::Transparency(TransparencyPage {
                impact: impact.clone(),
            }));
        }
    }
    if sections.real_assets {
        pages.push(PageDescriptor::RealAssetAudit(RealAssetAuditPage {
            jurisdictions: report
                .real_assets
                .iter()
                .filter(|j| j.has_content())
                .cloned()
                .collect(),
        }));
    }
    if sections.migration_programs {
        pages.push(PageDescriptor::MigrationPrograms(MigrationProgramsPage {
            programs: report.migration_programs.clone(),
        }));
    }
    if sections.hnwi_trends {
        pages.push(PageDescriptor::HnwiTrends(HnwiTrendsPage {
            trends: report.hnwi_trends.clone(),
        }));
    }
    if sections.tax_regimes {
        pages.push(PageDescriptor::TaxRegimeIntelligence(TaxRegimeIntelligencePage {
            regimes: report.tax_regimes.clone(),
        }));
    }
    if sections.crisis {
        pages.push(PageDescriptor::CrisisResilience(CrisisResiliencePage {
            crisis: report.crisis.clone(),
        }));
    }
    if sections.decision_tree {
        pages.push(PageDescriptor::DecisionTree(DecisionTreePage {
            tree: report.decision_tree.clone(),
        }));
    }
    if sections.heirs {
        pages.push(PageDescriptor::HeirManagement(HeirManagementPage {
            heirs: report.heirs.clone(),
            succession: report.succession.clone(),
        }));
    }

    pages.push(PageDescriptor::ClosingSummary(ClosingSummaryPage {
        classification: report.verdict.classification.clone(),
        total_exposure: report.total_exposure,
        differential_points: report.tax.as_ref().map(|t| t.differential_points),
        improvement_points: report.succession.improvement_points,
        vetoed: sections.veto,
    }));

    pages.push(PageDescriptor::LegalClosing(LegalClosingPage {
        client_name: report.client_name.clone(),
        notice: CONFIDENTIALITY_NOTICE,
    }));

    pages
}
