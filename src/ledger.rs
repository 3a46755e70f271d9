//! Checksum Ledger
//!
//! The persisted path-to-content-hash table used to detect staleness across
//! runs. One entry per line, `<hex-hash><two spaces><absolute path>`, the
//! same check-file convention `b3sum` emits, so an external hash utility can
//! verify the ledger directly.

use crate::error::LedgerError;
use crate::hasher;
use crate::types::Hash;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// "The last known good render was produced from source content with this
/// hash." At most one entry per absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub path: PathBuf,
    pub hash: Hash,
}

/// Insertion-ordered entries with a path-keyed index for O(1) lookup.
///
/// Order preservation matters: `upsert` replaces in place, so the persisted
/// file diffs deterministically across runs.
pub struct ChecksumLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<PathBuf, usize>,
}

impl ChecksumLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Exact path match only; no normalization beyond what was stored.
    pub fn lookup(&self, path: &Path) -> Option<&LedgerEntry> {
        self.index.get(path).map(|i| &self.entries[*i])
    }

    /// Replace the hash in place for an existing path (position preserved),
    /// or append a new entry. Returns true when a new entry was appended.
    pub fn upsert(&mut self, path: PathBuf, hash: Hash) -> bool {
        if let Some(&i) = self.index.get(&path) {
            self.entries[i].hash = hash;
            false
        } else {
            self.index.insert(path.clone(), self.entries.len());
            self.entries.push(LedgerEntry { path, hash });
            true
        }
    }

    /// Remove entries whose source file no longer exists on disk. Returns
    /// the removed paths. The core render pass never does this; it is a
    /// user-driven operation (`bindery prune`).
    pub fn prune_missing(&mut self) -> Vec<PathBuf> {
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.path.is_file());
        self.entries = kept;
        self.index.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.path.clone(), i);
        }
        removed.into_iter().map(|e| e.path).collect()
    }

    /// Load the ledger from disk.
    ///
    /// Tolerant: a missing or empty file yields an empty ledger, never an
    /// error. Malformed lines are skipped with a warning so one bad edit
    /// does not wedge the tool.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)?;
        let mut ledger = Self::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            match parse_line(line, lineno + 1) {
                Ok(entry) => {
                    ledger.upsert(entry.path, entry.hash);
                }
                Err(e) => {
                    tracing::warn!("Skipping ledger line: {}", e);
                }
            }
        }
        Ok(ledger)
    }

    /// Write the ledger back to disk as a whole-file overwrite.
    ///
    /// Uses temporary file + rename so a crash mid-write never leaves a
    /// partial ledger behind.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&hasher::encode(&entry.hash));
            contents.push_str("  ");
            contents.push_str(&entry.path.to_string_lossy());
            contents.push('\n');
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents.as_bytes())?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LedgerError::Io(e)
        })?;

        tracing::debug!(entries = self.entries.len(), path = ?path, "ledger saved");
        Ok(())
    }

    /// Default ledger location for a source root: the XDG data directory
    /// keyed by the root path, with an in-tree fallback when no platform
    /// data directory exists.
    pub fn default_path(source_root: &Path) -> PathBuf {
        match crate::config::xdg::source_data_dir(source_root) {
            Ok(dir) => dir.join("checksums"),
            Err(_) => source_root.join(".bindery").join("checksums"),
        }
    }
}

impl Default for ChecksumLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one `<hex-hash>  <absolute path>` line. The two-space separator
/// cannot be confused with hash characters, and paths may contain single
/// spaces safely.
fn parse_line(line: &str, lineno: usize) -> Result<LedgerEntry, LedgerError> {
    let (hex_part, path_part) = line.split_once("  ").ok_or(LedgerError::Malformed {
        line: lineno,
        reason: "missing two-space separator".to_string(),
    })?;
    let hash = hasher::decode(hex_part).ok_or(LedgerError::Malformed {
        line: lineno,
        reason: format!("invalid hash '{}'", hex_part),
    })?;
    if path_part.is_empty() {
        return Err(LedgerError::Malformed {
            line: lineno,
            reason: "empty path".to_string(),
        });
    }
    Ok(LedgerEntry {
        path: PathBuf::from(path_part),
        hash,
    })
}
