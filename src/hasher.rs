//! Content hashing for ledger entries using BLAKE3

use crate::types::Hash;
use blake3::Hasher;
use std::fs::File;
use std::io;
use std::path::Path;

/// Compute the content hash of in-memory bytes.
pub fn hash_bytes(content: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}

/// Compute the content hash of a file, streaming rather than slurping.
///
/// Fails with the underlying I/O error when the file is missing or
/// unreadable; callers decide whether that is fatal.
pub fn hash_file(path: &Path) -> io::Result<Hash> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(*hasher.finalize().as_bytes())
}

/// Hex form used in the persisted ledger (matches `b3sum` output).
pub fn encode(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parse the hex form back into a hash. Returns None for anything that is
/// not exactly 64 hex characters.
pub fn decode(hex_str: &str) -> Option<Hash> {
    let bytes = hex::decode(hex_str).ok()?;
    bytes.try_into().ok()
}
