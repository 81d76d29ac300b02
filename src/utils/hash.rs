//! Hash calculation utilities.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Buffer size for reading files (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Streaming SHA-256 hasher for file content.
pub struct HashCalculator;

impl HashCalculator {
    /// Calculate the SHA-256 hash of a file, streaming it in fixed-size
    /// chunks so large inputs are never loaded whole.
    ///
    /// Returns `None` when the hash is not computable: permission error,
    /// missing file, or a directory. The classifier maps that to a
    /// low-confidence flagged verdict instead of aborting the scan.
    pub fn sha256_file(path: &Path) -> Option<String> {
        let file = File::open(path).ok()?;
        if file.metadata().ok()?.is_dir() {
            return None;
        }

        let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; BUFFER_SIZE];

        loop {
            let bytes_read = reader.read(&mut buffer).ok()?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Some(hex::encode(hasher.finalize()))
    }

    /// Calculate the SHA-256 hash of an in-memory byte slice.
    pub fn sha256_bytes(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }
}
