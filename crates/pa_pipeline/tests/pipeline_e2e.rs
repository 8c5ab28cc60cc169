//! End-to-end pipeline tests: payload in, document + generation record out.

use serde_json::json;

use pa_pipeline::{
    engine_identifiers, run_from_payload_path, run_with_payload, EPOCH_TIMESTAMP_UTC,
};
use pa_report::PageKind;

fn kinds(outputs: &pa_pipeline::AuditOutputs) -> Vec<PageKind> {
    outputs.pages.iter().map(|p| p.kind()).collect()
}

#[test]
fn risk_factor_exposures_sum_without_preformatted_total() {
    let payload = json!({
        "preview": {
            "risk_factors": [
                { "cost": "$500,000" },
                { "cost_numeric": 250000 }
            ]
        }
    });
    let outputs =
        run_with_payload(&payload, &engine_identifiers(), EPOCH_TIMESTAMP_UTC).expect("run");
    assert_eq!(outputs.report.total_exposure, 750_000.0);
    assert_eq!(
        outputs.document["pages"][1]["total_exposure_display"],
        json!("$750K")
    );
}

#[test]
fn mixed_heir_allocations_normalize_independently() {
    let payload = json!({
        "preview": {
            "heir_allocations": [
                { "allocation_pct": 0.4 },
                { "allocation_pct": 60 }
            ]
        }
    });
    let outputs =
        run_with_payload(&payload, &engine_identifiers(), EPOCH_TIMESTAMP_UTC).expect("run");
    let pcts: Vec<u8> = outputs.report.heirs.iter().map(|h| h.allocation_pct).collect();
    assert_eq!(pcts, vec![40, 60]);
    assert!(kinds(&outputs).contains(&PageKind::HeirManagement));
}

#[test]
fn missing_projection_omits_the_wealth_page() {
    let payload = json!({ "preview": { "client_name": "A. Client" } });
    let outputs =
        run_with_payload(&payload, &engine_identifiers(), EPOCH_TIMESTAMP_UTC).expect("run");
    assert!(!kinds(&outputs).contains(&PageKind::WealthProjection));

    let with_projection = json!({
        "preview": {
            "wealth_projection_data": { "starting_value": 5_000_000 }
        }
    });
    let outputs = run_with_payload(&with_projection, &engine_identifiers(), EPOCH_TIMESTAMP_UTC)
        .expect("run");
    assert!(kinds(&outputs).contains(&PageKind::WealthProjection));
}

#[test]
fn veto_replaces_the_verdict_page_end_to_end() {
    let payload = json!({
        "preview": {
            "structural_verdict": "DO_NOT_PROCEED",
            "via_negativa": { "day_one_loss_pct": 14 }
        }
    });
    let outputs =
        run_with_payload(&payload, &engine_identifiers(), EPOCH_TIMESTAMP_UTC).expect("run");
    let kinds = kinds(&outputs);
    assert!(kinds.contains(&PageKind::VetoVerdict));
    assert!(!kinds.contains(&PageKind::Verdict));
    assert!(outputs.report.veto.is_some());
}

#[test]
fn identical_payloads_produce_identical_records() {
    let payload = json!({
        "preview": {
            "client_name": "A. Client",
            "risk_factors": [{ "title": "ABSD", "cost": "$500,000" }]
        },
        "memo": { "precedent_count": 12 }
    });
    let meta = engine_identifiers();
    let a = run_with_payload(&payload, &meta, EPOCH_TIMESTAMP_UTC).expect("run a");
    let b = run_with_payload(&payload, &meta, EPOCH_TIMESTAMP_UTC).expect("run b");
    assert_eq!(a.record.id, b.record.id);
    assert_eq!(a.record.payload_sha256, b.record.payload_sha256);
    assert_eq!(a.record.document_sha256, b.record.document_sha256);
    assert_eq!(a.record.page_count, b.record.page_count);
    assert!(a.record.id.starts_with("AUD:1970-01-01T00:00:00Z-"));
}

#[test]
fn key_order_does_not_change_the_in_memory_payload_digest() {
    let a = json!({ "preview": { "client_name": "C", "risk_level": "high" } });
    let b = json!({ "preview": { "risk_level": "high", "client_name": "C" } });
    let meta = engine_identifiers();
    let ra = run_with_payload(&a, &meta, EPOCH_TIMESTAMP_UTC).expect("run a");
    let rb = run_with_payload(&b, &meta, EPOCH_TIMESTAMP_UTC).expect("run b");
    assert_eq!(ra.record.payload_sha256, rb.record.payload_sha256);
}

#[test]
fn path_entry_point_loads_and_digests_raw_bytes() {
    use std::io::Write;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("payload.json");
    let mut f = std::fs::File::create(&path).expect("create");
    f.write_all(br#"{"preview": {"client_name": "A. Client"}}"#).expect("write");
    let utf8 = camino::Utf8PathBuf::from_path_buf(path).expect("utf8 path");

    let outputs = run_from_payload_path(&utf8, &engine_identifiers(), EPOCH_TIMESTAMP_UTC)
        .expect("run");
    assert_eq!(outputs.report.client_name, "A. Client");
    assert_eq!(outputs.record.payload_sha256.len(), 64);
    assert_eq!(outputs.record.page_count, outputs.pages.len());
}

#[test]
fn partial_payload_still_renders_a_consistent_document() {
    // Garbage-shaped members degrade; mandatory pages always assemble.
    let payload = json!({
        "preview": {
            "risk_factors": "not a list",
            "tax_comparison": 7,
            "heir_allocations": [{}]
        }
    });
    let outputs =
        run_with_payload(&payload, &engine_identifiers(), EPOCH_TIMESTAMP_UTC).expect("run");
    let kinds = kinds(&outputs);
    assert_eq!(kinds[0], PageKind::Cover);
    assert_eq!(*kinds.last().unwrap(), PageKind::LegalClosing);
    assert_eq!(
        outputs.document["page_count"],
        json!(outputs.pages.len())
    );
}
