//! Core type aliases and run-level result types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// BLAKE3 content hash (32 bytes)
pub type Hash = [u8; 32];

/// Why a candidate was sent to the renderer.
///
/// The three staleness predicates are independent; any one of them is
/// sufficient. The recorded reason is the first sufficient one, checked in
/// the order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderReason {
    /// The output artifact does not exist at its expected target path.
    OutputMissing,
    /// The ledger has no entry for this source path.
    NoLedgerEntry,
    /// The verification pass flagged the source as modified out of band.
    ContentChanged,
    /// A forced run renders everything regardless of staleness.
    Forced,
}

impl std::fmt::Display for RenderReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RenderReason::OutputMissing => "output missing",
            RenderReason::NoLedgerEntry => "no ledger entry",
            RenderReason::ContentChanged => "content changed",
            RenderReason::Forced => "forced",
        };
        write!(f, "{}", label)
    }
}

/// Render-or-skip decision for one candidate. Computed fresh each run,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderDecision {
    Skip,
    Render(RenderReason),
}

/// Decide render-or-skip from the three independent staleness predicates.
///
/// OR semantics: any one true predicate is sufficient to render. `force`
/// short-circuits everything.
pub fn decide(
    output_exists: bool,
    has_ledger_entry: bool,
    mismatched: bool,
    force: bool,
) -> RenderDecision {
    if force {
        return RenderDecision::Render(RenderReason::Forced);
    }
    if !output_exists {
        RenderDecision::Render(RenderReason::OutputMissing)
    } else if !has_ledger_entry {
        RenderDecision::Render(RenderReason::NoLedgerEntry)
    } else if mismatched {
        RenderDecision::Render(RenderReason::ContentChanged)
    } else {
        RenderDecision::Skip
    }
}

/// Final state of one candidate after the render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Up to date; not sent to the renderer.
    Skipped,
    /// Rendered successfully; ledger entry updated.
    Rendered(RenderReason),
    /// Renderer failed; ledger entry left exactly as it was.
    Failed { reason: RenderReason, error: String },
}

/// Per-candidate record in a [`RenderReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Path relative to the source root.
    pub relative: PathBuf,
    pub outcome: RenderOutcome,
}

/// Result of one full render pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    pub files: Vec<FileOutcome>,
    pub rendered: usize,
    pub failed: usize,
    pub skipped: usize,
    /// True when the staging ledger was written back to disk this run.
    pub ledger_persisted: bool,
}

impl RenderReport {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            rendered: 0,
            failed: 0,
            skipped: 0,
            ledger_persisted: false,
        }
    }

    /// Number of candidates actually sent to the renderer.
    pub fn attempted(&self) -> usize {
        self.rendered + self.failed
    }

    /// True when every candidate was skipped (nothing to do).
    pub fn up_to_date(&self) -> bool {
        self.attempted() == 0
    }
}

impl Default for RenderReport {
    fn default() -> Self {
        Self::new()
    }
}
