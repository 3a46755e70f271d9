//! CLI route: maps parsed commands onto the core services.

use crate::cli::presentation::{
    format_render_summary, format_status_json, format_status_text, format_verify_json,
    format_verify_text,
};
use crate::config::{save_workspace_config, BinderyConfig, ConfigLoader};
use crate::discover::SubdirPolicy;
use crate::error::RunError;
use crate::ledger::ChecksumLedger;
use crate::orchestrator::{RenderService, RunSettings};
use crate::renderer::CommandRenderer;
use crate::verify;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use super::parse::Commands;

/// Resolved execution context for one CLI invocation: the workspace root and
/// the layered configuration with CLI overrides already applied.
pub struct RunContext {
    pub config: BinderyConfig,
    pub workspace_root: PathBuf,
}

impl RunContext {
    pub fn new(
        workspace_root: &Path,
        config_path: Option<&Path>,
        source_override: Option<PathBuf>,
        target_override: Option<PathBuf>,
    ) -> Result<Self, RunError> {
        let workspace_root = workspace_root
            .canonicalize()
            .map_err(|_| RunError::SourceRootMissing(workspace_root.to_path_buf()))?;

        let mut config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };

        if source_override.is_some() {
            config.source_root = source_override;
        }
        if target_override.is_some() {
            config.target_root = target_override;
        }

        Ok(Self {
            config,
            workspace_root,
        })
    }

    pub fn execute(&self, command: &Commands) -> Result<String, RunError> {
        match command {
            Commands::Render { force } => self.handle_render(*force),
            Commands::Status { format } => self.handle_status(format),
            Commands::Verify { format } => self.handle_verify(format),
            Commands::Prune { dry_run } => self.handle_prune(*dry_run),
            Commands::Setup => self.handle_setup(),
            Commands::Doctor => self.handle_doctor(),
        }
    }

    fn handle_render(&self, force: bool) -> Result<String, RunError> {
        let settings = self.settings(force)?;
        let renderer = CommandRenderer::new(&self.config.renderer);
        if !renderer.is_available() {
            return Err(RunError::RendererUnavailable(
                self.config.renderer.clone(),
            ));
        }

        let report = RenderService::execute(&settings, &renderer)?;
        Ok(format_render_summary(&report))
    }

    fn handle_status(&self, format: &str) -> Result<String, RunError> {
        let settings = self.settings(false)?;
        // A status check on an empty tree is an answer, not an error.
        let candidates = settings.scanner().discover()?;
        let ledger = ChecksumLedger::load(&settings.ledger_path)?;
        let mismatches = verify::verify(&ledger).mismatch_set();
        let plan = RenderService::plan(&settings, &candidates, &ledger, &mismatches);

        match format {
            "json" => format_status_json(&plan),
            _ => Ok(format_status_text(&plan)),
        }
    }

    fn handle_verify(&self, format: &str) -> Result<String, RunError> {
        let source_root = self.resolve_source_root()?;
        let ledger_path = self.resolve_ledger_path(&source_root);
        let ledger = ChecksumLedger::load(&ledger_path)?;
        let report = verify::verify(&ledger);

        match format {
            "json" => format_verify_json(&report),
            _ => Ok(format_verify_text(&report)),
        }
    }

    fn handle_prune(&self, dry_run: bool) -> Result<String, RunError> {
        let source_root = self.resolve_source_root()?;
        let ledger_path = self.resolve_ledger_path(&source_root);
        let mut ledger = ChecksumLedger::load(&ledger_path)?;
        let removed = ledger.prune_missing();

        if removed.is_empty() {
            return Ok("No stale ledger entries.".to_string());
        }

        let mut lines: Vec<String> = removed
            .iter()
            .map(|p| format!("  {}", p.display()))
            .collect();

        if dry_run {
            lines.insert(0, format!("Would remove {} entries:", removed.len()));
        } else {
            ledger.save(&ledger_path)?;
            lines.insert(0, format!("Removed {} entries:", removed.len()));
        }
        Ok(lines.join("\n"))
    }

    fn handle_setup(&self) -> Result<String, RunError> {
        let source_root: String = Input::new()
            .with_prompt("Source directory to scan for documents")
            .default(
                self.config
                    .source_root
                    .as_deref()
                    .unwrap_or(Path::new("."))
                    .display()
                    .to_string(),
            )
            .interact_text()
            .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;

        let target_root: String = Input::new()
            .with_prompt("Target directory for rendered output")
            .default(
                self.config
                    .target_root
                    .as_deref()
                    .unwrap_or(Path::new("rendered"))
                    .display()
                    .to_string(),
            )
            .interact_text()
            .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;

        let renderer: String = Input::new()
            .with_prompt("Renderer program")
            .default(self.config.renderer.clone())
            .interact_text()
            .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;

        let options: String = Input::new()
            .with_prompt("Renderer options (space-separated, empty for none)")
            .allow_empty(true)
            .default(self.config.renderer_options.join(" "))
            .interact_text()
            .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;

        let policy_choice = Select::new()
            .with_prompt("Subdirectory policy")
            .items(&[
                "Render all subdirectories",
                "Only subdirectories matching fragments",
                "All except subdirectories matching fragments",
            ])
            .default(0)
            .interact()
            .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;

        let mut config = self.config.clone();
        config.source_root = Some(PathBuf::from(source_root));
        config.target_root = Some(PathBuf::from(target_root));
        config.renderer = renderer;
        config.renderer_options = options.split_whitespace().map(String::from).collect();
        config.include.clear();
        config.exclude.clear();

        if policy_choice != 0 {
            let fragments: String = Input::new()
                .with_prompt("Path fragments (space-separated)")
                .interact_text()
                .map_err(|e| RunError::Config(format!("Failed to get user input: {}", e)))?;
            let fragments: Vec<String> =
                fragments.split_whitespace().map(String::from).collect();
            if policy_choice == 1 {
                config.include = fragments;
            } else {
                config.exclude = fragments;
            }
        }

        let path = save_workspace_config(&self.workspace_root, &config)?;
        Ok(format!("Settings saved to {}", path.display()))
    }

    fn handle_doctor(&self) -> Result<String, RunError> {
        let mut lines = Vec::new();
        let ok = "ok".green().to_string();
        let fail = "fail".red().to_string();

        let renderer = CommandRenderer::new(&self.config.renderer);
        if renderer.is_available() {
            lines.push(format!("[{}] renderer '{}' is runnable", ok, renderer.program()));
        } else {
            lines.push(format!(
                "[{}] renderer '{}' not found on PATH",
                fail,
                renderer.program()
            ));
        }

        match &self.config.source_root {
            Some(root) => {
                let resolved = self.absolutize(root);
                if resolved.is_dir() {
                    lines.push(format!("[{}] source root {}", ok, resolved.display()));
                } else {
                    lines.push(format!(
                        "[{}] source root {} is not a directory",
                        fail,
                        resolved.display()
                    ));
                }
            }
            None => lines.push(format!("[{}] source root is not configured", fail)),
        }

        match &self.config.target_root {
            Some(root) => {
                lines.push(format!("[{}] target root {}", ok, self.absolutize(root).display()))
            }
            None => lines.push(format!("[{}] target root is not configured", fail)),
        }

        if let Ok(source_root) = self.resolve_source_root() {
            let ledger_path = self.resolve_ledger_path(&source_root);
            if ledger_path.is_file() {
                lines.push(format!("[{}] ledger at {}", ok, ledger_path.display()));
            } else {
                lines.push(format!(
                    "[{}] no ledger yet (will be created at {})",
                    ok,
                    ledger_path.display()
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Resolve the full run settings, failing fast on unset or unreadable
    /// roots so nothing downstream runs on a half-configured workspace.
    fn settings(&self, force: bool) -> Result<RunSettings, RunError> {
        let source_root = self.resolve_source_root()?;
        let target_root = self
            .config
            .target_root
            .as_ref()
            .map(|p| self.absolutize(p))
            .ok_or(RunError::TargetRootUnset)?;
        let ledger_path = self.resolve_ledger_path(&source_root);

        Ok(RunSettings {
            source_root,
            target_root,
            renderer_options: self.config.renderer_options.clone(),
            extensions: self.config.extensions.clone(),
            policy: self.config.subdir_policy()?,
            ledger_path,
            force,
        })
    }

    /// Canonical source root. Canonicalization keeps ledger keys stable
    /// across invocations from different working directories.
    fn resolve_source_root(&self) -> Result<PathBuf, RunError> {
        let configured = self
            .config
            .source_root
            .as_ref()
            .ok_or(RunError::SourceRootUnset)?;
        let resolved = self.absolutize(configured);
        resolved
            .canonicalize()
            .map_err(|_| RunError::SourceRootMissing(resolved))
    }

    fn resolve_ledger_path(&self, source_root: &Path) -> PathBuf {
        match &self.config.ledger_path {
            Some(path) => self.absolutize(path),
            None => ChecksumLedger::default_path(source_root),
        }
    }

    /// Relative config paths are taken against the workspace root, not the
    /// process working directory.
    fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }
}
