//! crates/pa_extract/src/hasher.rs
//! SHA-256 provenance digests and audit-id construction.
//!
//! The generation record echoes digests of the source payload and of the
//! rendered document so two runs over identical inputs are verifiably the
//! same audit.

use digest::Digest;
use sha2::Sha256;

use crate::{ExtractError, ExtractResult};

/// Lowercase SHA-256 hex of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Audit id: `"AUD:<YYYY-MM-DDTHH:MM:SSZ>-<16-hex>"`, the hex being the
/// leading 16 nybbles of the canonical document digest.
pub fn audit_id_from_bytes(timestamp_utc: &str, canonical_bytes: &[u8]) -> ExtractResult<String> {
    if timestamp_utc.is_empty() {
        return Err(ExtractError::Hash("empty timestamp".into()));
    }
    let digest = sha256_hex(canonical_bytes);
    Ok(format!("AUD:{timestamp_utc}-{}", &digest[..16]))
}
