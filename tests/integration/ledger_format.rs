//! Integration tests for the on-disk ledger interchange format.
//!
//! Each line is `<64 hex chars><two spaces><absolute path>`, the same shape
//! `b3sum` emits, so external tooling can read and write the file.

use crate::integration::test_utils::{FakeRenderer, TestWorkspace};
use bindery::hasher;
use bindery::ledger::ChecksumLedger;
use bindery::orchestrator::RenderService;
use std::fs;

#[test]
fn test_persisted_lines_match_the_interchange_format() {
    let ws = TestWorkspace::new();
    ws.write_doc("a/x.md", "x");
    ws.write_doc("c/z.md", "z");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    let content = fs::read_to_string(&ws.ledger_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    for line in lines {
        let (hash, path) = line.split_once("  ").unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(path.starts_with('/'));
        assert!(!path.starts_with(' '));
    }
}

#[test]
fn test_externally_written_ledger_is_readable() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "external");

    let line = format!(
        "{}  {}\n",
        hasher::encode(&hasher::hash_bytes(b"external")),
        doc.display()
    );
    fs::create_dir_all(ws.ledger_path.parent().unwrap()).unwrap();
    fs::write(&ws.ledger_path, line).unwrap();

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(
        ledger.lookup(&doc).unwrap().hash,
        hasher::hash_bytes(b"external")
    );
}

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let ws = TestWorkspace::new();
    let doc = ws.write_doc("doc.md", "good");

    let content = format!(
        "not a ledger line\n{}  {}\nzz  /bad/hex\n",
        hasher::encode(&hasher::hash_bytes(b"good")),
        doc.display()
    );
    fs::create_dir_all(ws.ledger_path.parent().unwrap()).unwrap();
    fs::write(&ws.ledger_path, content).unwrap();

    let ledger = ChecksumLedger::load(&ws.ledger_path).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.lookup(&doc).is_some());
}

#[test]
fn test_rerender_updates_entry_in_place() {
    let ws = TestWorkspace::new();
    let first = ws.write_doc("first.md", "one");
    ws.write_doc("second.md", "two");
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    let before = fs::read_to_string(&ws.ledger_path).unwrap();
    let first_line_path = before.lines().next().unwrap().split_once("  ").unwrap().1;

    fs::write(&first, "one, edited").unwrap();
    RenderService::execute(&ws.settings(), &FakeRenderer::new()).unwrap();

    // Same entry order, same entry count, new hash for the edited file.
    let after = fs::read_to_string(&ws.ledger_path).unwrap();
    assert_eq!(after.lines().count(), 2);
    assert_eq!(
        after.lines().next().unwrap().split_once("  ").unwrap().1,
        first_line_path
    );
    assert_ne!(before, after);
}
