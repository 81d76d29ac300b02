//! On-disk signature store: load, seed, and offline merge updates.

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::detection::signature::{SignatureDocument, SignatureSet};
use serde::Serialize;
use std::path::Path;

/// Read-only loader and out-of-band updater for the signature document.
pub struct SignatureStore {
    config: Config,
}

/// Result of merging a signature update document.
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// Digests newly added by the merge
    pub added: usize,
    /// Total digests after the merge
    pub total: usize,
    /// Version of the merged document
    pub version: String,
    /// Update date of the merged document
    pub updated: String,
}

impl SignatureStore {
    /// Create a store rooted at the configured data directory.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load the signature document, seeding the default educational set
    /// when the file is absent or corrupt.
    pub fn load(&self) -> Result<SignatureDocument> {
        let path = self.config.signatures_path();

        if !path.exists() {
            let seed = SignatureDocument::default_seed();
            self.save(&seed)?;
            return Ok(seed);
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| Error::file_read(&path, e))?;
        match serde_json::from_str::<SignatureDocument>(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                log::warn!("Corrupt signature file {:?} ({}), restoring defaults", path, e);
                let seed = SignatureDocument::default_seed();
                self.save(&seed)?;
                Ok(seed)
            }
        }
    }

    /// Load just the digest set for a scan invocation.
    pub fn load_set(&self) -> Result<SignatureSet> {
        Ok(self.load()?.sha256_set())
    }

    /// Validate and merge an incoming update document from a local file.
    pub fn update_from_file(&self, update_path: &Path) -> Result<MergeOutcome> {
        let existing = self.load()?;

        let raw = std::fs::read_to_string(update_path)
            .map_err(|e| Error::from_io(update_path, e))?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| Error::SignatureValidation(format!("Signature file is not valid JSON: {}", e)))?;
        SignatureDocument::validate_schema(&value)?;

        let incoming: SignatureDocument = serde_json::from_value(value)
            .map_err(|e| Error::SignatureValidation(format!("Signature file has invalid structure: {}", e)))?;

        let merged = SignatureDocument::merge(&existing, &incoming);
        self.save(&merged)?;

        let before = existing.sha256_set().len();
        let total = merged.sha256_set().len();
        log::info!("Signature update merged: {} new digest(s), {} total", total - before, total);

        Ok(MergeOutcome {
            added: total - before,
            total,
            version: merged.version,
            updated: merged.updated,
        })
    }

    fn save(&self, doc: &SignatureDocument) -> Result<()> {
        self.config.ensure_data_dir()?;
        let path = self.config.signatures_path();
        let contents = serde_json::to_string_pretty(doc)?;
        std::fs::write(&path, contents).map_err(|e| Error::file_write(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &Path) -> SignatureStore {
        SignatureStore::new(Config::with_data_dir(dir))
    }

    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const HASH_C: &str = "cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

    #[test]
    fn test_load_seeds_default() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let doc = store.load().unwrap();
        assert_eq!(doc.sha256_set().len(), 3);
        assert!(dir.path().join("signatures.json").exists());
    }

    #[test]
    fn test_corrupt_file_restores_default() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join("signatures.json"), "garbage").unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.sha256_set().len(), 3);
    }

    #[test]
    fn test_update_merges_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let update_path = dir.path().join("update.json");
        let update = serde_json::json!({
            "version": "2.0",
            "updated": "2025-06-01",
            "hashes": { "sha256": [HASH_B, HASH_C] }
        });
        std::fs::write(&update_path, update.to_string()).unwrap();

        let outcome = store.update_from_file(&update_path).unwrap();
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.version, "2.0");

        // Re-merging the same document adds nothing
        let outcome = store.update_from_file(&update_path).unwrap();
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.total, 5);
    }

    #[test]
    fn test_update_rejects_bad_schema() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let update_path = dir.path().join("bad.json");
        std::fs::write(&update_path, r#"{"version": "2.0"}"#).unwrap();

        let err = store.update_from_file(&update_path).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}
