// crates/pa_cli/src/main.rs
//
// Exit-code mapping, CLI parsing, the inspect-only short-circuit, and the
// full run path (engine meta → load → pipeline → artifacts).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
}

use std::fs;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};

use pa_pipeline::{engine_identifiers, run_from_payload_path, AuditOutputs, PipelineError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Unreadable/unparseable payload, bad arguments.
    Validation(String),
    /// Filesystem errors (read/write/path/limits).
    Io(String),
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("pa: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            let (code, msg) = match &e {
                MainError::Validation(m) => (exitcodes::VALIDATION, m),
                MainError::Io(m) => (exitcodes::IO, m),
            };
            eprintln!("pa: error: {msg}");
            code
        }
    };

    ExitCode::from(rc as u8)
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let outputs = run_from_payload_path(&args.payload, &engine_identifiers(), &args.timestamp)
        .map_err(map_pipeline_err)?;

    if args.inspect_only {
        println!("{}", inspect_line(&outputs));
        return Ok(());
    }

    write_artifacts(args, &outputs)?;
    if !args.quiet {
        eprintln!(
            "pa: {} ({} pages) -> {}",
            outputs.record.id, outputs.record.page_count, args.out
        );
    }
    Ok(())
}

/// One-line normalize summary for `--inspect-only`.
fn inspect_line(outputs: &AuditOutputs) -> String {
    format!(
        "client={} classification={} verdict={:?} pages={} exposure={}",
        outputs.report.client_name,
        outputs.report.verdict.classification,
        outputs.report.structural_verdict,
        outputs.pages.len(),
        pa_report::format_currency(outputs.report.total_exposure),
    )
}

fn write_artifacts(args: &Args, outputs: &AuditOutputs) -> Result<(), MainError> {
    fs::create_dir_all(&args.out)
        .map_err(|e| MainError::Io(format!("create {}: {e}", args.out)))?;

    if args.render.iter().any(|r| r == "json") {
        let doc_path = args.out.join("document.json");
        let doc = serde_json::to_vec_pretty(&outputs.document)
            .map_err(|e| MainError::Validation(format!("serialize document: {e}")))?;
        fs::write(&doc_path, doc).map_err(|e| MainError::Io(format!("write {doc_path}: {e}")))?;
    }

    let record_path = args.out.join("generation_record.json");
    let record = serde_json::to_vec_pretty(&outputs.record)
        .map_err(|e| MainError::Validation(format!("serialize record: {e}")))?;
    fs::write(&record_path, record)
        .map_err(|e| MainError::Io(format!("write {record_path}: {e}")))?;

    Ok(())
}

/// Translate pa_pipeline::PipelineError into MainError buckets.
fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Json(m) => MainError::Validation(format!("json: {m}")),
        PipelineError::Canon(m) => MainError::Validation(format!("canon: {m}")),
        PipelineError::Hash(m) => MainError::Validation(format!("hash: {m}")),
        PipelineError::Io(m) => MainError::Io(format!("io: {m}")),
        PipelineError::Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}
