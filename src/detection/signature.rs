//! Signature document format and the in-memory signature set.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Signature document format (`signatures.json`).
///
/// ```json
/// { "version": "1.0", "updated": "2025-01-01",
///   "hashes": { "sha256": ["..."], "notes": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureDocument {
    /// Document version string
    pub version: String,
    /// Date of last update
    pub updated: String,
    /// Hash lists
    pub hashes: HashBlock,
}

/// Hash block within a signature document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashBlock {
    /// Lowercase hex SHA-256 digests of flagged content
    pub sha256: Vec<String>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SignatureDocument {
    /// The built-in educational seed document.
    ///
    /// These are fake/test digests only; they do not correspond to real
    /// malware.
    pub fn default_seed() -> Self {
        Self {
            version: "1.0".to_string(),
            updated: "2025-01-01".to_string(),
            hashes: HashBlock {
                sha256: vec![
                    "0000000000000000000000000000000000000000000000000000000000000000"
                        .to_string(),
                    "1111111111111111111111111111111111111111111111111111111111111111"
                        .to_string(),
                    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
                        .to_string(),
                ],
                notes: Some("These are fake/test hashes for educational use.".to_string()),
            },
        }
    }

    /// Extract the set of valid digests, lowercased.
    ///
    /// Entries that are not exactly 64 characters are silently dropped.
    pub fn sha256_set(&self) -> SignatureSet {
        let digests = self
            .hashes
            .sha256
            .iter()
            .filter(|h| h.len() == DIGEST_HEX_LEN)
            .map(|h| h.to_lowercase())
            .collect();
        SignatureSet { digests }
    }

    /// Validate an untyped incoming update document.
    ///
    /// Required keys: `version`, `updated`, `hashes.sha256` as a list of
    /// 64-character strings.
    pub fn validate_schema(obj: &Value) -> Result<()> {
        let map = obj
            .as_object()
            .ok_or_else(|| Error::SignatureValidation("Signature file root must be an object.".into()))?;

        if !map.contains_key("version") || !map.contains_key("updated") || !map.contains_key("hashes") {
            return Err(Error::SignatureValidation(
                "Signature file missing required keys: version, updated, hashes.".into(),
            ));
        }

        let hashes = map
            .get("hashes")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::SignatureValidation("hashes must be an object.".into()))?;

        let sha_list = hashes
            .get("sha256")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::SignatureValidation("hashes.sha256 must be a list.".into()))?;

        for h in sha_list {
            match h.as_str() {
                Some(s) if s.len() == DIGEST_HEX_LEN => {}
                _ => {
                    return Err(Error::SignatureValidation(
                        "Each sha256 hash must be a 64-character hex string.".into(),
                    ))
                }
            }
        }

        Ok(())
    }

    /// Merge an incoming update document into an existing one.
    ///
    /// Produces the case-insensitive union of digests, sorted. Version and
    /// update date come from the incoming document when present; notes are
    /// preserved from the existing document unless the incoming one carries
    /// non-empty notes of its own.
    pub fn merge(existing: &SignatureDocument, incoming: &SignatureDocument) -> SignatureDocument {
        let mut union: HashSet<String> = existing.sha256_set().into_digests();
        union.extend(incoming.sha256_set().into_digests());

        let mut merged: Vec<String> = union.into_iter().collect();
        merged.sort();

        let notes = incoming
            .hashes
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .or_else(|| existing.hashes.notes.clone())
            .or_else(|| Some("Educational signature set.".to_string()));

        SignatureDocument {
            version: incoming.version.clone(),
            updated: incoming.updated.clone(),
            hashes: HashBlock {
                sha256: merged,
                notes,
            },
        }
    }
}

/// In-memory set of known flagged digests.
///
/// Loaded once per scan invocation and never mutated during a scan; updates
/// happen out-of-band via the merge operation.
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    digests: HashSet<String>,
}

impl SignatureSet {
    /// Exact-match, case-insensitive membership test.
    pub fn contains(&self, digest: &str) -> bool {
        self.digests.contains(&digest.to_lowercase())
    }

    /// Number of digests in the set.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    fn into_digests(self) -> HashSet<String> {
        self.digests
    }
}
