//! Verification Pass
//!
//! Re-hashes every ledger-known file to detect out-of-band modification.
//! The recorded hash alone cannot detect drift (edits, restores from backup,
//! another process touching the file); only re-checking the live content can.

use crate::hasher;
use crate::ledger::ChecksumLedger;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Absolute paths whose live content no longer matches the recorded hash.
pub type MismatchSet = HashSet<PathBuf>;

/// Detailed verification result for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Files whose live hash differs from the recorded one.
    pub mismatched: Vec<PathBuf>,
    /// Ledger paths that no longer exist or could not be read. Treated as
    /// mismatched so the next render pass attempts them again.
    pub missing: Vec<PathBuf>,
    /// Entries whose live hash still matches.
    pub clean: usize,
}

impl VerifyReport {
    /// Collapse into the staleness signal the orchestrator consumes.
    pub fn mismatch_set(&self) -> MismatchSet {
        self.mismatched
            .iter()
            .chain(self.missing.iter())
            .cloned()
            .collect()
    }
}

/// Recompute the content hash for every ledger entry and compare against the
/// recorded value.
pub fn verify(ledger: &ChecksumLedger) -> VerifyReport {
    let mut report = VerifyReport {
        mismatched: Vec::new(),
        missing: Vec::new(),
        clean: 0,
    };

    for entry in ledger.entries() {
        match hasher::hash_file(&entry.path) {
            Ok(live) if live == entry.hash => report.clean += 1,
            Ok(_) => {
                tracing::debug!(path = ?entry.path, "content hash drifted");
                report.mismatched.push(entry.path.clone());
            }
            Err(e) => {
                tracing::debug!(path = ?entry.path, error = %e, "ledger path unreadable");
                report.missing.push(entry.path.clone());
            }
        }
    }

    report
}
