//! CLI parse: clap types for Bindery. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bindery CLI - Incremental document rendering
#[derive(Parser)]
#[command(name = "bindery")]
#[command(about = "Incremental document rendering driven by a content-addressed checksum ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where .bindery.toml lives)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured source root
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Override the configured target root
    #[arg(long)]
    pub target_root: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render documents that are new, changed, or missing their output
    Render {
        /// Render every candidate regardless of staleness
        #[arg(long)]
        force: bool,
    },
    /// Show per-file render decisions without rendering
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-hash ledger entries and report out-of-band modifications
    Verify {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Remove ledger entries whose source file no longer exists
    Prune {
        /// Report what would be removed without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Interactively capture source, target, and renderer settings
    Setup,
    /// Check renderer availability and configuration
    Doctor,
}
