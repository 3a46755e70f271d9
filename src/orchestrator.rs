//! Render Orchestrator
//!
//! Consumes the filter engine's candidate list, the checksum ledger, and the
//! verification pass's mismatch set; decides render-or-skip per candidate,
//! invokes the external renderer, and reconciles the staging ledger.
//!
//! Staleness decisions and ledger updates are per-file; there are no
//! multi-file transactions and no retries within a run. A failed render is
//! simply absent from "up to date" and absent from "just updated", so its
//! missing output guarantees another attempt on the next run.

use crate::discover::{Scanner, SubdirPolicy};
use crate::error::RunError;
use crate::hasher;
use crate::ledger::ChecksumLedger;
use crate::renderer::{RenderJob, Renderer};
use crate::types::{decide, FileOutcome, RenderDecision, RenderOutcome, RenderReport};
use crate::verify::{self, MismatchSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Explicit run state threaded through discovery, verification, and the
/// render pass. No ambient mutable globals.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Absolute source root. Callers resolve this before constructing the
    /// settings so ledger keys stay stable across runs.
    pub source_root: PathBuf,
    /// Absolute target root; subdirectories are created on demand.
    pub target_root: PathBuf,
    /// Pass-through option list for the external renderer.
    pub renderer_options: Vec<String>,
    /// Recognized document extensions.
    pub extensions: Vec<String>,
    pub policy: SubdirPolicy,
    /// On-disk location of the checksum ledger.
    pub ledger_path: PathBuf,
    /// Render every candidate regardless of staleness.
    pub force: bool,
}

impl RunSettings {
    pub fn scanner(&self) -> Scanner {
        Scanner::new(
            self.source_root.clone(),
            self.extensions.clone(),
            self.policy.clone(),
        )
    }
}

/// One row of a decision-only pass (`bindery status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRow {
    pub relative: PathBuf,
    pub decision: RenderDecision,
}

/// Decision-only view of a run: what `run` would do, without doing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPlan {
    pub rows: Vec<PlanRow>,
    pub to_render: usize,
    pub up_to_date: usize,
}

/// Stateless orchestration service.
pub struct RenderService;

impl RenderService {
    /// Target artifact path for a root-relative source path: the extension
    /// is appended rather than replaced (`a/x.md` -> `<target>/a/x.md.pdf`),
    /// keeping the original extension visible in the artifact name.
    pub fn output_path(target_root: &Path, relative: &Path) -> PathBuf {
        let mut name = relative
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".pdf");
        match relative.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                target_root.join(parent).join(name)
            }
            _ => target_root.join(name),
        }
    }

    /// Compute the render-or-skip decision for every candidate without
    /// touching the renderer or the ledger.
    pub fn plan(
        settings: &RunSettings,
        candidates: &[PathBuf],
        ledger: &ChecksumLedger,
        mismatches: &MismatchSet,
    ) -> RenderPlan {
        let mut rows = Vec::with_capacity(candidates.len());
        let mut to_render = 0;

        for relative in candidates {
            let source = settings.source_root.join(relative);
            let output = Self::output_path(&settings.target_root, relative);
            let decision = decide(
                output.is_file(),
                ledger.lookup(&source).is_some(),
                mismatches.contains(&source),
                settings.force,
            );
            if matches!(decision, RenderDecision::Render(_)) {
                to_render += 1;
            }
            rows.push(PlanRow {
                relative: relative.clone(),
                decision,
            });
        }

        let up_to_date = rows.len() - to_render;
        RenderPlan {
            rows,
            to_render,
            up_to_date,
        }
    }

    /// The render pass proper: decide per candidate, invoke the renderer,
    /// and fold successful results into the staging ledger.
    ///
    /// One renderer failure never aborts the batch; the failed path's ledger
    /// entry is left exactly as it was. Ledger persistence is the caller's
    /// job, gated on `report.attempted() > 0`.
    pub fn run(
        settings: &RunSettings,
        candidates: &[PathBuf],
        ledger: &mut ChecksumLedger,
        mismatches: &MismatchSet,
        renderer: &dyn Renderer,
    ) -> RenderReport {
        let mut report = RenderReport::new();

        for relative in candidates {
            let source = settings.source_root.join(relative);
            let output = Self::output_path(&settings.target_root, relative);

            let decision = decide(
                output.is_file(),
                ledger.lookup(&source).is_some(),
                mismatches.contains(&source),
                settings.force,
            );

            let reason = match decision {
                RenderDecision::Skip => {
                    report.skipped += 1;
                    report.files.push(FileOutcome {
                        relative: relative.clone(),
                        outcome: RenderOutcome::Skipped,
                    });
                    continue;
                }
                RenderDecision::Render(reason) => reason,
            };

            // Observability only, not control flow.
            println!("Converting {}", relative.display());
            tracing::info!(source = ?relative, %reason, "rendering");

            match Self::render_one(&source, &output, &settings.renderer_options, renderer) {
                Ok(hash) => {
                    ledger.upsert(source, hash);
                    report.rendered += 1;
                    report.files.push(FileOutcome {
                        relative: relative.clone(),
                        outcome: RenderOutcome::Rendered(reason),
                    });
                }
                Err(e) => {
                    tracing::warn!(source = ?relative, error = %e, "render failed");
                    report.failed += 1;
                    report.files.push(FileOutcome {
                        relative: relative.clone(),
                        outcome: RenderOutcome::Failed {
                            reason,
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        report
    }

    /// Render one candidate: mirror the source's subdirectory under the
    /// target, invoke the renderer, and on success re-hash the source *now*
    /// so the ledger records exactly what was rendered.
    fn render_one(
        source: &Path,
        output: &Path,
        options: &[String],
        renderer: &dyn Renderer,
    ) -> Result<crate::types::Hash, RunError> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }

        let resource_dir = source
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        renderer.render(&RenderJob {
            source: source.to_path_buf(),
            resource_dir,
            options: options.to_vec(),
            output: output.to_path_buf(),
        })?;

        Ok(hasher::hash_file(source)?)
    }

    /// Full run: discover, verify, render, and persist the staging ledger.
    ///
    /// Preconditions (fatal, nothing is attempted): unreadable source root,
    /// zero candidates. When every candidate is skipped the ledger file is
    /// left untouched, not even rewritten with identical content.
    ///
    /// A save failure does not discard the run: the rendered artifacts are
    /// already on disk, so the report comes back with `ledger_persisted`
    /// false and the prior ledger intact. Those files re-render next run.
    pub fn execute(
        settings: &RunSettings,
        renderer: &dyn Renderer,
    ) -> Result<RenderReport, RunError> {
        let candidates = settings.scanner().discover()?;
        if candidates.is_empty() {
            return Err(RunError::NoCandidates(settings.source_root.clone()));
        }

        let mut ledger = ChecksumLedger::load(&settings.ledger_path)?;
        let mismatches = verify::verify(&ledger).mismatch_set();

        let mut report = Self::run(settings, &candidates, &mut ledger, &mismatches, renderer);

        if report.attempted() > 0 {
            match ledger.save(&settings.ledger_path) {
                Ok(()) => report.ledger_persisted = true,
                Err(e) => {
                    tracing::warn!(
                        path = ?settings.ledger_path,
                        error = %e,
                        "ledger not persisted"
                    );
                }
            }
        }

        Ok(report)
    }
}
