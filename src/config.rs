//! Configuration System
//!
//! Layered settings for a run: XDG global file, then the workspace file,
//! then `BINDERY_*` environment overrides. The core treats the resolved
//! values as an opaque read: it behaves the same whether they came from
//! `bindery setup` or a hand-edited file.

use crate::discover::{SubdirPolicy, DEFAULT_EXTENSIONS};
use crate::error::RunError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Workspace config file name, looked up at the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = ".bindery.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinderyConfig {
    /// Directory scanned for document sources.
    pub source_root: Option<PathBuf>,

    /// Directory that receives rendered artifacts.
    pub target_root: Option<PathBuf>,

    /// External renderer program.
    #[serde(default = "default_renderer")]
    pub renderer: String,

    /// Options passed through to the renderer unmodified and unvalidated.
    #[serde(default)]
    pub renderer_options: Vec<String>,

    /// Subdirectory include fragments (mutually exclusive with `exclude`).
    #[serde(default)]
    pub include: Vec<String>,

    /// Subdirectory exclude fragments (mutually exclusive with `include`).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Recognized document extensions.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Checksum ledger location; defaults to the XDG data dir keyed by the
    /// source root.
    pub ledger_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_renderer() -> String {
    "pandoc".to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for BinderyConfig {
    fn default() -> Self {
        Self {
            source_root: None,
            target_root: None,
            renderer: default_renderer(),
            renderer_options: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: default_extensions(),
            ledger_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl BinderyConfig {
    /// Build the typed subdirectory policy, enforcing the at-most-one
    /// invariant.
    pub fn subdir_policy(&self) -> Result<SubdirPolicy, RunError> {
        match (self.include.is_empty(), self.exclude.is_empty()) {
            (true, true) => Ok(SubdirPolicy::None),
            (false, true) => Ok(SubdirPolicy::Include(self.include.clone())),
            (true, false) => Ok(SubdirPolicy::Exclude(self.exclude.clone())),
            (false, false) => Err(RunError::Config(
                "Both include and exclude are set; at most one subdirectory policy may be active"
                    .to_string(),
            )),
        }
    }
}

/// Loads configuration with XDG-then-workspace-then-environment precedence.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load for a workspace: defaults, then the XDG global file, then the
    /// workspace `.bindery.toml`, then `BINDERY_*` environment variables.
    /// Missing files are fine; the tool runs on defaults plus overrides.
    pub fn load(workspace_root: &Path) -> Result<BinderyConfig, RunError> {
        let mut builder = Config::builder().add_source(Config::try_from(&BinderyConfig::default())?);

        if let Some(global) = Self::xdg_config_path() {
            if global.exists() {
                builder = builder.add_source(File::from(global).required(false));
            }
        }

        let workspace_file = workspace_root.join(WORKSPACE_CONFIG_FILE);
        if workspace_file.exists() {
            builder = builder.add_source(File::from(workspace_file).required(false));
        }

        builder = builder.add_source(Self::environment_source());

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load from an explicit file, still applying environment overrides.
    pub fn load_from_file(path: &Path) -> Result<BinderyConfig, RunError> {
        let builder = Config::builder()
            .add_source(Config::try_from(&BinderyConfig::default())?)
            .add_source(File::from(path.to_path_buf()))
            .add_source(Self::environment_source());

        Ok(builder.build()?.try_deserialize()?)
    }

    /// `BINDERY_*` overrides. List-valued fields arrive as one env string,
    /// so they are split on commas; everything else deserializes as a
    /// scalar.
    fn environment_source() -> Environment {
        Environment::with_prefix("BINDERY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("renderer_options")
            .with_list_parse_key("include")
            .with_list_parse_key("exclude")
            .with_list_parse_key("extensions")
    }

    /// Global config file: `~/.config/bindery/config.toml` (platform
    /// equivalent via the `directories` crate).
    pub fn xdg_config_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "bindery")?;
        Some(dirs.config_dir().join("config.toml"))
    }
}

/// Persist settings to the workspace file. Used by `bindery setup`; the next
/// run picks them up through the normal load path.
pub fn save_workspace_config(
    workspace_root: &Path,
    config: &BinderyConfig,
) -> Result<PathBuf, RunError> {
    let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
    let serialized = toml::to_string_pretty(config)
        .map_err(|e| RunError::Config(format!("Failed to serialize settings: {}", e)))?;
    std::fs::write(&path, serialized)?;
    Ok(path)
}

/// XDG path helpers
pub mod xdg {
    use crate::error::RunError;
    use crate::hasher;
    use std::path::{Path, PathBuf};

    /// Per-source-root state directory:
    /// `$XDG_DATA_HOME/bindery/sources/<root-hash>`.
    pub fn source_data_dir(source_root: &Path) -> Result<PathBuf, RunError> {
        let dirs = directories::ProjectDirs::from("", "", "bindery").ok_or_else(|| {
            RunError::Config("Could not determine platform data directory".to_string())
        })?;
        let key_bytes = hasher::hash_bytes(source_root.to_string_lossy().as_bytes());
        let key = hex::encode(&key_bytes[..8]);
        Ok(dirs.data_dir().join("sources").join(key))
    }
}
