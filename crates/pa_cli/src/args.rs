//! crates/pa_cli/src/args.rs
//! Offline CLI argument surface: parsing, local-path checks, normalization.
//!
//! Rules:
//! - no networked paths (any `<scheme>://` is rejected, including `file://`);
//! - `--payload` must exist before the pipeline runs;
//! - `--inspect-only` loads + normalizes, prints a one-line summary, and
//!   writes nothing.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pa",
    disable_help_subcommand = true,
    about = "Offline, deterministic Pattern Audit document generator"
)]
pub struct Args {
    /// Raw analytics payload JSON path (local file only).
    #[arg(long)]
    pub payload: Utf8PathBuf,

    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: Utf8PathBuf,

    /// Renderer to emit. Omit to skip the document (the record is always written).
    #[arg(long, value_parser = ["json"], num_args = 0..=1)]
    pub render: Vec<String>,

    /// Timestamp stamped into the generation record (RFC3339 Z). Defaults to
    /// a fixed epoch so repeated runs stay byte-identical.
    #[arg(long, default_value = pa_pipeline::EPOCH_TIMESTAMP_UTC)]
    pub timestamp: String,

    /// Load + normalize only; print a one-line summary and write nothing.
    #[arg(long)]
    pub inspect_only: bool,

    /// Suppress non-essential stderr logs.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument parsing/validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    BadTimestamp(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            BadTimestamp(t) => write!(f, "invalid timestamp: {t}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

fn validate(args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.payload)?;
    ensure_local_path(&args.out)?;
    if !args.payload.is_file() {
        return Err(CliError::NotFound(args.payload.to_string()));
    }
    if args.timestamp.trim().is_empty() {
        return Err(CliError::BadTimestamp(args.timestamp.clone()));
    }
    Ok(args)
}

/// Reject any explicit URI scheme; path existence is checked separately.
#[inline]
fn ensure_local_path(p: &Utf8Path) -> Result<(), CliError> {
    if pa_extract::looks_like_url_strict(p.as_str()) {
        return Err(CliError::NonLocalPath(p.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_args(payload: Utf8PathBuf) -> Args {
        Args {
            payload,
            out: Utf8PathBuf::from("."),
            render: vec!["json".into()],
            timestamp: pa_pipeline::EPOCH_TIMESTAMP_UTC.to_string(),
            inspect_only: false,
            quiet: true,
        }
    }

    fn temp_payload() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.json");
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(b"{}").expect("write");
        (dir, Utf8PathBuf::from_path_buf(path).expect("utf8"))
    }

    #[test]
    fn url_like_payload_paths_are_rejected() {
        let args = base_args(Utf8PathBuf::from("https://example.com/p.json"));
        assert!(matches!(validate(args), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn missing_payload_is_rejected() {
        let args = base_args(Utf8PathBuf::from("/nonexistent/payload.json"));
        assert!(matches!(validate(args), Err(CliError::NotFound(_))));
    }

    #[test]
    fn existing_payload_validates() {
        let (_dir, path) = temp_payload();
        assert!(validate(base_args(path)).is_ok());
    }

    #[test]
    fn empty_timestamp_is_rejected() {
        let (_dir, path) = temp_payload();
        let mut args = base_args(path);
        args.timestamp = "  ".into();
        assert!(matches!(validate(args), Err(CliError::BadTimestamp(_))));
    }
}
