//! crates/pa_extract/src/lib.rs — extraction layer for the Pattern Audit engine.
//!
//! Everything between the raw analytics payload and typed values lives here:
//!
//! - `loader`  — local-file payload loading + provenance digest (offline only)
//! - `canon`   — canonical JSON bytes (recursively key-sorted)
//! - `hasher`  — SHA-256 hex + audit-id construction
//! - `coerce`  — display/number coercion for arbitrary JSON values
//! - `money`   — monetary amount extraction from free-form strings
//! - `resolve` — declarative alias table + first-defined-value resolution
//!
//! Error posture: only *loading* can fail. Coercion, parsing, and resolution
//! are total — malformed content degrades to documented defaults, never to an
//! error the caller has to handle.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for pa_extract (used by loader/canon/hasher).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Filesystem / path errors (read, non-local path, missing file).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON deserialization errors with an optional JSON Pointer hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Canonicalization errors (non-serializable input).
    #[error("canonicalization error: {0}")]
    Canon(String),

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Input size/shape limits.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root. Callers may
        // enrich this at higher layers.
        ExtractError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/* ---------------- Public modules (single source of truth) ---------------- */

pub mod canon;
pub mod coerce;
pub mod hasher;
pub mod loader;
pub mod money;
pub mod resolve;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
/// The loader follows a strict offline posture and rejects these early.
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

/* ---------------- Public prelude ---------------- */

pub mod prelude {
    pub use crate::{looks_like_url_strict, ExtractError, ExtractResult};

    pub use crate::canon;
    pub use crate::coerce;
    pub use crate::hasher;
    pub use crate::loader;
    pub use crate::money;
    pub use crate::resolve;

    // Commonly used items across the workspace.
    pub use crate::canon::to_canonical_bytes;
    pub use crate::coerce::{coerce_number, coerce_text};
    pub use crate::hasher::sha256_hex;
    pub use crate::loader::{load_payload, PayloadEnvelope};
    pub use crate::money::parse_amount;
    pub use crate::resolve::{resolve, resolve_number, resolve_text, Field};
}
