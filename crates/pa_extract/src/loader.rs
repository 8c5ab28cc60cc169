//! crates/pa_extract/src/loader.rs
//! Payload loading: read a local JSON file, record its provenance digest,
//! and hand the parsed value to the pipeline. No network I/O; any
//! `<scheme>://` path is rejected before touching the filesystem.
//!
//! Loading is the only fallible stage of the engine. Once a payload parses
//! as JSON, every downstream step degrades instead of failing.

use std::fs::File;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::{hasher, looks_like_url_strict, ExtractError, ExtractResult};

/// Hard cap on payload size; analytics payloads are hundreds of KB at most.
pub const MAX_PAYLOAD_BYTES: u64 = 32 * 1024 * 1024;

/// A loaded payload plus its provenance digest.
#[derive(Debug, Clone)]
pub struct PayloadEnvelope {
    pub payload: Value,
    /// SHA-256 hex of the raw file bytes (not the re-serialized value).
    pub payload_sha256: String,
    pub source: Utf8PathBuf,
}

/// Load and parse a raw report payload from a local path.
pub fn load_payload(path: &Utf8Path) -> ExtractResult<PayloadEnvelope> {
    if looks_like_url_strict(path.as_str()) {
        return Err(ExtractError::Path(format!(
            "path must be a local file (no scheme): {path}"
        )));
    }

    let file = File::open(path)
        .map_err(|e| ExtractError::Path(format!("open {path}: {e}")))?;
    let meta = file
        .metadata()
        .map_err(|e| ExtractError::Path(format!("stat {path}: {e}")))?;
    if meta.len() > MAX_PAYLOAD_BYTES {
        return Err(ExtractError::Limit(format!(
            "payload {path} exceeds {MAX_PAYLOAD_BYTES} bytes"
        )));
    }

    let mut bytes = Vec::with_capacity(meta.len() as usize);
    let mut reader = file;
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::Path(format!("read {path}: {e}")))?;

    let payload: Value = serde_json::from_slice(&bytes)?;
    let payload_sha256 = hasher::sha256_hex(&bytes);

    Ok(PayloadEnvelope { payload, payload_sha256, source: path.to_path_buf() })
}
