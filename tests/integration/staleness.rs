//! Integration tests for staleness detection: new files, content drift, and
//! the verification pass feeding the render decision.

use crate::integration::test_utils::{relative_invocations, FakeRenderer, TestWorkspace};
use bindery::hasher;
use bindery::ledger::ChecksumLedger;
use bindery::orchestrator::RenderService;
use bindery::verify;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_new_file_renders_exactly_once() {
    let ws = TestWorkspace::new();
    ws.write_doc("old.md", "seen before");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    ws.write_doc("new.md", "never seen");

    let renderer = FakeRenderer::new();
    let report = RenderService::execute(&ws.settings(), &renderer).unwrap();
    assert_eq!(report.rendered, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(
        relative_invocations(&renderer, &ws.source_root),
        vec![PathBuf::from("new.md")]
    );

    // Stable afterwards.
    let report = RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    assert_eq!(report.rendered, 0);
    assert_eq!(report.skipped, 2);
}

#[test]
fn test_out_of_band_edit_is_flagged_and_rerendered() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "version one");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    // Edit behind the tool's back. The output still exists and the ledger
    // still has an entry, so only the content hash can catch this.
    fs::write(&doc, "version two").unwrap();

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    let report = verify::verify(&ledger);
    assert_eq!(report.mismatched, vec![doc.clone()]);

    let renderer = FakeRenderer::new();
    let report = RenderService::execute(&ws.settings(), &renderer).unwrap();
    assert_eq!(report.rendered, 1);
    assert_eq!(renderer.invocations(), vec![doc.clone()]);

    // The ledger now holds the new content's hash.
    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    assert_eq!(
        ledger.lookup(&doc).unwrap().hash,
        hasher::hash_bytes(b"version two")
    );
}

#[test]
fn test_restored_content_settles_back_to_clean() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "original");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    fs::write(&doc, "edited").unwrap();
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    // Restore the original bytes. The hash matches what the ledger recorded
    // for "original"? No: the ledger was updated to "edited", so restoring
    // counts as another out-of-band change.
    fs::write(&doc, "original").unwrap();
    let report = RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    assert_eq!(report.rendered, 1);

    let report = RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_deleted_source_with_surviving_entry_is_reported_missing() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "transient");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    fs::remove_file(&doc).unwrap();

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    let report = verify::verify(&ledger);
    assert_eq!(report.missing, vec![doc]);
    assert_eq!(report.clean, 0);
}
