//! Integration tests for the end-to-end render pass: idempotence, missing
//! output recovery, and failure isolation.

use crate::integration::test_utils::{FakeRenderer, TestWorkspace};
use bindery::error::RunError;
use bindery::hasher;
use bindery::ledger::ChecksumLedger;
use bindery::orchestrator::RenderService;
use std::fs;

#[test]
fn test_first_run_renders_everything_and_persists_ledger() {
    let ws = TestWorkspace::new();
    ws.write_doc("a/x.md", "alpha");
    ws.write_doc("a/b/y.md", "beta");
    ws.write_doc("c/z.md", "gamma");

    let renderer = FakeRenderer::new();
    let report = RenderService::execute(&ws.settings(), &renderer).unwrap();

    assert_eq!(report.rendered, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped, 0);
    assert!(report.ledger_persisted);

    // Target mirrors the source layout with the extension appended.
    assert!(ws.output_for("a/x.md").is_file());
    assert!(ws.output_for("a/b/y.md").is_file());
    assert!(ws.output_for("c/z.md").is_file());

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    assert_eq!(ledger.len(), 3);
}

#[test]
fn test_second_run_is_idempotent_and_skips_ledger_write() {
    let ws = TestWorkspace::new();
    ws.write_doc("doc.md", "stable");

    let report = RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    assert_eq!(report.rendered, 1);
    let mtime_after_first = ws.ledger_mtime();

    let renderer = FakeRenderer::new();
    let report = RenderService::execute(&ws.settings(), &renderer).unwrap();
    assert_eq!(report.rendered, 0);
    assert_eq!(report.skipped, 1);
    assert!(!report.ledger_persisted);
    assert!(renderer.invocations().is_empty());

    // The ledger file itself is untouched, not rewritten with identical
    // content.
    assert_eq!(ws.ledger_mtime(), mtime_after_first);
}

#[test]
fn test_deleted_output_triggers_rerender() {
    let ws = TestWorkspace::new();
    ws.write_doc("doc.md", "stable");

    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    fs::remove_file(ws.output_for("doc.md")).unwrap();

    let report = RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();
    assert_eq!(report.rendered, 1);
    assert!(ws.output_for("doc.md").is_file());
}

#[test]
fn test_empty_source_tree_is_a_fatal_precondition() {
    let ws = TestWorkspace::new();
    let result = RenderService::execute(&ws.settings(), &FakeRenderer::new());
    assert!(matches!(result, Err(RunError::NoCandidates(_))));
    assert!(!ws.ledger_path.exists());
}

#[test]
fn test_failed_render_does_not_abort_batch_or_taint_ledger() {
    let ws = TestWorkspace::new();
    let f = ws.write_doc("f.md", "will fail");
    ws.write_doc("g.md", "will succeed");

    let renderer = FakeRenderer::new().failing_on(f.clone());
    let report = RenderService::execute(&ws.settings(), &renderer).unwrap();

    assert_eq!(report.rendered, 1);
    assert_eq!(report.failed, 1);
    assert!(report.ledger_persisted);
    assert!(!ws.output_for("f.md").exists());
    assert!(ws.output_for("g.md").is_file());

    // G made it into the ledger, F did not.
    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    assert!(ledger.lookup(&ws.source_root.join("g.md")).is_some());
    assert!(ledger.lookup(&f).is_none());

    // F's output is still missing, so the next run attempts it again.
    let retry = FakeRenderer::new();
    let report = RenderService::execute(&ws.settings(), &retry).unwrap();
    assert_eq!(report.rendered, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(retry.invocations(), vec![f]);
}

#[test]
fn test_save_failure_keeps_run_report_and_flags_unpersisted_ledger() {
    let ws = TestWorkspace::new();
    ws.write_doc("doc.md", "content");

    // The ledger path sits under a regular file, so the save cannot create
    // its parent directory.
    let blocker = ws.source_root.parent().unwrap().join("blocker");
    fs::write(&blocker, "in the way").unwrap();
    let mut settings = ws.settings();
    settings.ledger_path = blocker.join("checksums");

    let report = RenderService::execute(&settings, &FakeRenderer::new()).unwrap();
    assert_eq!(report.rendered, 1);
    assert!(!report.ledger_persisted);
    assert!(ws.output_for("doc.md").is_file());

    let summary = bindery::cli::format_render_summary(&report);
    assert!(summary.contains("not persisted"));

    // With no ledger entry the next run renders again rather than losing
    // track of the file.
    let renderer = FakeRenderer::new();
    let mut retry_settings = ws.settings();
    retry_settings.ledger_path = blocker.join("checksums");
    let report = RenderService::execute(&retry_settings, &renderer).unwrap();
    assert_eq!(report.rendered, 1);
}

#[test]
fn test_forced_run_renders_up_to_date_files() {
    let ws = TestWorkspace::new();
    ws.write_doc("doc.md", "stable");

    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    let mut settings = ws.settings();
    settings.force = true;
    let renderer = FakeRenderer::new();
    let report = RenderService::execute(&settings, &renderer).unwrap();
    assert_eq!(report.rendered, 1);
    assert_eq!(renderer.invocations().len(), 1);
}

#[test]
fn test_ledger_records_hash_of_rendered_content() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "exact bytes");

    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    let entry = ledger.lookup(&doc).unwrap();
    assert_eq!(entry.hash, hasher::hash_bytes(b"exact bytes"));
}
