//! CLI presentation: text and JSON formatting for command results.

use crate::error::RunError;
use crate::orchestrator::RenderPlan;
use crate::types::{RenderDecision, RenderReport};
use crate::verify::VerifyReport;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Summary line for a render run. Distinguishes "up to date" (no renders
/// attempted, ledger untouched) from "ledger updated" (at least one render
/// attempted, regardless of individual success).
pub fn format_render_summary(report: &RenderReport) -> String {
    if report.up_to_date() {
        return format!(
            "All documents are up to date ({} checked).",
            report.skipped
        );
    }

    let mut summary = format!(
        "Ledger updated: {} rendered, {} skipped.",
        report.rendered.to_string().green(),
        report.skipped
    );
    if report.failed > 0 {
        summary = format!(
            "Ledger updated: {} rendered, {} failed, {} skipped.",
            report.rendered.to_string().green(),
            report.failed.to_string().red(),
            report.skipped
        );
    }
    if !report.ledger_persisted {
        summary.push_str(" Warning: ledger was not persisted.");
    }
    summary
}

/// Per-file decision table for `bindery status`.
pub fn format_status_text(plan: &RenderPlan) -> String {
    if plan.rows.is_empty() {
        return "No document sources found.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["File", "Decision", "Reason"]);
    for row in &plan.rows {
        let (decision, reason) = match &row.decision {
            RenderDecision::Skip => ("skip".to_string(), "up to date".to_string()),
            RenderDecision::Render(reason) => ("render".to_string(), reason.to_string()),
        };
        table.add_row(vec![
            row.relative.display().to_string(),
            decision,
            reason,
        ]);
    }

    format!(
        "{}\n{} to render, {} up to date.",
        table, plan.to_render, plan.up_to_date
    )
}

pub fn format_status_json(plan: &RenderPlan) -> Result<String, RunError> {
    serde_json::to_string_pretty(plan).map_err(|e| RunError::Config(e.to_string()))
}

pub fn format_verify_text(report: &VerifyReport) -> String {
    if report.mismatched.is_empty() && report.missing.is_empty() {
        return format!("All {} ledger entries verified.", report.clean);
    }

    let mut lines = Vec::new();
    for path in &report.mismatched {
        lines.push(format!("{} {}", "modified".yellow(), path.display()));
    }
    for path in &report.missing {
        lines.push(format!("{}  {}", "missing".red(), path.display()));
    }
    lines.push(format!(
        "{} clean, {} modified, {} missing.",
        report.clean,
        report.mismatched.len(),
        report.missing.len()
    ));
    lines.join("\n")
}

pub fn format_verify_json(report: &VerifyReport) -> Result<String, RunError> {
    serde_json::to_string_pretty(report).map_err(|e| RunError::Config(e.to_string()))
}
