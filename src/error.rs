//! Error types for the Bindery incremental rendering system.

use std::path::PathBuf;
use thiserror::Error;

/// Ledger storage errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed ledger line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Run-level errors for discovery, rendering, and configuration
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Source root {0:?} does not exist or is not a directory")]
    SourceRootMissing(PathBuf),

    #[error("Source root is not configured. Run `bindery setup` or pass --source-root.")]
    SourceRootUnset,

    #[error("Target root is not configured. Run `bindery setup` or pass --target-root.")]
    TargetRootUnset,

    #[error("No document sources found under {0:?}")]
    NoCandidates(PathBuf),

    #[error("Renderer '{0}' is not available. Is it installed and on PATH?")]
    RendererUnavailable(String),

    #[error("Renderer failed for {path:?} (exit status {status})")]
    RendererFailed { path: PathBuf, status: i32 },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for RunError {
    fn from(err: config::ConfigError) -> Self {
        RunError::Config(err.to_string())
    }
}
