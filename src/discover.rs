//! Source discovery: extension-filtered directory scan with an
//! include/exclude subdirectory policy.

use crate::error::RunError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Document extensions recognized when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown", "mkd", "txt"];

/// Which subdirectories under the source root are eligible.
///
/// At most one policy is active. Fragments match as substrings of the
/// root-relative path, so `Include(["drafts"])` keeps both `drafts/a.md`
/// and `book/drafts/b.md`. An empty fragment list means "no filtering".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubdirPolicy {
    None,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl SubdirPolicy {
    /// Typed predicate over a root-relative path.
    pub fn matches(&self, relative: &str) -> bool {
        match self {
            SubdirPolicy::None => true,
            SubdirPolicy::Include(fragments) => {
                fragments.is_empty() || fragments.iter().any(|f| relative.contains(f.as_str()))
            }
            SubdirPolicy::Exclude(fragments) => {
                !fragments.iter().any(|f| relative.contains(f.as_str()))
            }
        }
    }
}

impl Default for SubdirPolicy {
    fn default() -> Self {
        SubdirPolicy::None
    }
}

/// Filter engine: enumerates candidate source files under a root.
pub struct Scanner {
    source_root: PathBuf,
    extensions: Vec<String>,
    policy: SubdirPolicy,
}

impl Scanner {
    pub fn new(source_root: PathBuf, extensions: Vec<String>, policy: SubdirPolicy) -> Self {
        Self {
            source_root,
            extensions,
            policy,
        }
    }

    /// Enumerate all document files under the source root, apply the
    /// subdirectory policy, and return root-relative paths sorted for
    /// determinism.
    ///
    /// Fails if the source root does not exist or is unreadable. Zero
    /// matches is a valid (empty) result; the "no candidates" precondition
    /// is enforced one layer up.
    pub fn discover(&self) -> Result<Vec<PathBuf>, RunError> {
        if !self.source_root.is_dir() {
            return Err(RunError::SourceRootMissing(self.source_root.clone()));
        }

        let mut candidates = Vec::new();

        for entry in WalkDir::new(&self.source_root).follow_links(false) {
            let entry = entry.map_err(|e| {
                RunError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk {:?}: {}", self.source_root, e),
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.has_document_extension(entry.path()) {
                continue;
            }

            // Root-stripped, extension-inclusive.
            let relative = entry
                .path()
                .strip_prefix(&self.source_root)
                .unwrap_or(entry.path())
                .to_path_buf();

            if self.policy.matches(&relative.to_string_lossy()) {
                candidates.push(relative);
            }
        }

        candidates.sort();
        tracing::debug!(
            count = candidates.len(),
            root = ?self.source_root,
            "discovery complete"
        );
        Ok(candidates)
    }

    fn has_document_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
