//! pa_pipeline — deterministic orchestration
//! (load → normalize → derive → include → assemble → generation record).
//!
//! The crate is I/O-free except for the path-based entry point, which
//! delegates loading to `pa_extract::loader`. Everything after loading is
//! pure: the same payload, engine meta, and timestamp always produce the
//! same document bytes and the same generation record.

#![deny(unsafe_code)]

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pa_core::model::CanonicalReport;
use pa_extract::canon::to_canonical_bytes;
use pa_extract::hasher::{audit_id_from_bytes, sha256_hex};
use pa_extract::loader::load_payload;
use pa_extract::ExtractError;
use pa_metrics::inclusion::SectionSet;
use pa_report::{assemble, render_document_json, PageDescriptor};

pub mod normalize;
pub use normalize::normalize;

/// Timestamp used when no clock is supplied; keeps library-level runs
/// reproducible.
pub const EPOCH_TIMESTAMP_UTC: &str = "1970-01-01T00:00:00Z";

/// Engine identifiers echoed into every generation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Engine identifiers for this build of the workspace.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "PatternAudit".to_string(),
        name: "pa_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "unset".to_string(),
    }
}

/// Provenance record for one generated document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// `"AUD:<ts>-<hex16>"`, the hex being the head of the document digest.
    pub id: String,
    pub timestamp_utc: String,
    pub engine: EngineMeta,
    /// SHA-256 of the source payload (raw file bytes for path-based runs,
    /// canonical bytes for in-memory runs).
    pub payload_sha256: String,
    /// SHA-256 of the rendered document's canonical bytes.
    pub document_sha256: String,
    pub page_count: usize,
}

/// Everything one run produces.
#[derive(Debug)]
pub struct AuditOutputs {
    pub report: CanonicalReport,
    pub sections: SectionSet,
    pub pages: Vec<PageDescriptor>,
    pub document: Value,
    pub record: GenerationRecord,
}

/// Single error surface for the orchestration. Only loading and
/// canonicalization can fail; normalization itself is total.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Json(String),
    Canon(String),
    Hash(String),
    Limit(String),
}

impl From<ExtractError> for PipelineError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Path(m) => PipelineError::Io(m),
            ExtractError::Json { pointer, msg } => {
                PipelineError::Json(format!("{pointer}: {msg}"))
            }
            ExtractError::Canon(m) => PipelineError::Canon(m),
            ExtractError::Hash(m) => PipelineError::Hash(m),
            ExtractError::Limit(m) => PipelineError::Limit(m),
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Json(m) => write!(f, "json: {m}"),
            PipelineError::Canon(m) => write!(f, "canon: {m}"),
            PipelineError::Hash(m) => write!(f, "hash: {m}"),
            PipelineError::Limit(m) => write!(f, "limit: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Run the full pipeline over an already-parsed payload.
///
/// Pure given its arguments: normalize → evaluate section predicates →
/// assemble → render → digest. The payload digest is computed over the
/// payload's canonical bytes (key order does not matter).
pub fn run_with_payload(
    payload: &Value,
    engine_meta: &EngineMeta,
    timestamp_utc: &str,
) -> Result<AuditOutputs, PipelineError> {
    let payload_sha256 = sha256_hex(&to_canonical_bytes(payload)?);
    run_inner(payload, engine_meta, timestamp_utc, payload_sha256)
}

/// Load a payload from a local path, then run the pipeline. The record's
/// payload digest covers the raw file bytes.
pub fn run_from_payload_path(
    path: &Utf8Path,
    engine_meta: &EngineMeta,
    timestamp_utc: &str,
) -> Result<AuditOutputs, PipelineError> {
    let envelope = load_payload(path)?;
    run_inner(&envelope.payload, engine_meta, timestamp_utc, envelope.payload_sha256)
}

fn run_inner(
    payload: &Value,
    engine_meta: &EngineMeta,
    timestamp_utc: &str,
    payload_sha256: String,
) -> Result<AuditOutputs, PipelineError> {
    let report = normalize(payload);
    let sections = SectionSet::evaluate(&report);
    let pages = assemble(&report, &sections);
    let document = render_document_json(&pages);

    let document_bytes = to_canonical_bytes(&document)?;
    let document_sha256 = sha256_hex(&document_bytes);
    let id = audit_id_from_bytes(timestamp_utc, &document_bytes)?;

    let record = GenerationRecord {
        id,
        timestamp_utc: timestamp_utc.to_string(),
        engine: engine_meta.clone(),
        payload_sha256,
        document_sha256,
        page_count: pages.len(),
    };

    Ok(AuditOutputs { report, sections, pages, document, record })
}
