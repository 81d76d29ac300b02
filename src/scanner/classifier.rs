//! Per-file classification: the core decision logic of the pipeline.
//!
//! Checks run in strict precedence order, short-circuiting at the first
//! match: unreadable file, EICAR test string, signature match, heuristics,
//! clean. The EICAR check deliberately precedes the signature check so a
//! known-benign test signature is never reported as real malware.

use crate::core::types::{FileVerdict, VerdictStatus};
use crate::detection::heuristic::evaluate_heuristics;
use crate::detection::signature::SignatureSet;
use crate::utils::hash::HashCalculator;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// EICAR test file standard string.
/// This is the industry-standard test content for antivirus software.
const EICAR_STRING: &[u8] =
    b"X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR-STANDARD-ANTIVIRUS-TEST-FILE!$H+H*";

/// Maximum size of a file considered for EICAR content scanning (5 MiB).
const EICAR_MAX_SIZE: u64 = 5 * 1024 * 1024;

/// Minimum combined heuristic score that produces a flagged verdict.
pub const HEURISTIC_FLAG_THRESHOLD: u8 = 25;

/// Extensions whose content is text-like enough to scan for the EICAR
/// string.
const TEXT_LIKE_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".log", ".json", ".xml", ".html", ".htm", ".css", ".js", ".vbs", ".ps1",
    ".bat", ".cmd", ".py", ".csv", ".ini", ".yml", ".yaml",
];

/// Single-file classifier.
///
/// Holds the signature set for the duration of one scan invocation;
/// lookups are read-only so one classifier can serve a whole scan.
pub struct Classifier {
    signatures: SignatureSet,
    heuristics_enabled: bool,
}

impl Classifier {
    /// Create a classifier over a loaded signature set.
    pub fn new(signatures: SignatureSet, heuristics_enabled: bool) -> Self {
        Self {
            signatures,
            heuristics_enabled,
        }
    }

    /// Classify a single file, producing exactly one verdict.
    ///
    /// Never errors: per-file problems become low-confidence flagged
    /// verdicts so a single bad file cannot abort a scan.
    pub fn classify(&self, path: &Path) -> FileVerdict {
        let display = path.display().to_string();

        let sha = match HashCalculator::sha256_file(path) {
            Some(sha) => sha,
            None => {
                log::debug!("hash not computable for {:?}", path);
                return FileVerdict::new(
                    display,
                    "",
                    VerdictStatus::HeuristicFlag,
                    10,
                    vec!["Could not read file (permission or access issue).".to_string()],
                );
            }
        };

        if detect_eicar(path) {
            return FileVerdict::new(
                display,
                sha,
                VerdictStatus::EicarTest,
                90,
                vec!["EICAR test string detected (harmless test signature).".to_string()],
            );
        }

        if self.signatures.contains(&sha) {
            log::info!("signature match for {:?}", path);
            return FileVerdict::new(
                display,
                sha,
                VerdictStatus::SignatureMatch,
                100,
                vec!["Offline signature match (educational signature set).".to_string()],
            );
        }

        if self.heuristics_enabled {
            let report = evaluate_heuristics(path);
            if report.risk_score >= HEURISTIC_FLAG_THRESHOLD {
                return FileVerdict::new(
                    display,
                    sha,
                    VerdictStatus::HeuristicFlag,
                    report.risk_score,
                    report.reasons,
                );
            }
        }

        FileVerdict::clean(display, sha)
    }
}

/// Detect the EICAR test string in a safe, read-only way.
///
/// Only small-to-moderate text-like files are scanned; any error means
/// "not detected".
fn detect_eicar(path: &Path) -> bool {
    let ext = match path.extension() {
        Some(e) => format!(".{}", e.to_string_lossy().to_lowercase()),
        None => return false,
    };
    if !TEXT_LIKE_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }

    let metadata = match path.metadata() {
        Ok(m) => m,
        Err(_) => return false,
    };
    if metadata.len() > EICAR_MAX_SIZE {
        return false;
    }

    let mut data = Vec::with_capacity(metadata.len() as usize);
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    if file.read_to_end(&mut data).is_err() {
        return false;
    }

    contains_subsequence(&data, EICAR_STRING)
}

/// Byte-level substring search.
fn contains_subsequence(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return needle.is_empty();
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
