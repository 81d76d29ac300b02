//! Core type definitions used throughout av-lite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification outcome for a single scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// No indicators found
    Clean,
    /// Flagged by one or more heuristic rules
    HeuristicFlag,
    /// Exact match against the offline signature set
    SignatureMatch,
    /// EICAR test string found (harmless, by definition)
    EicarTest,
}

impl VerdictStatus {
    /// Get string representation for storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Clean => "clean",
            VerdictStatus::HeuristicFlag => "heuristic_flag",
            VerdictStatus::SignatureMatch => "signature_match",
            VerdictStatus::EicarTest => "eicar_test",
        }
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for a single scanned unit.
///
/// For files extracted from an archive, `path` is formatted as
/// `archive_path!member_path`. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVerdict {
    /// Path of the scanned file (or `archive!member` for archive entries)
    pub path: String,
    /// Lowercase hex SHA-256 digest, empty when the file could not be read
    pub sha256: String,
    /// Classification status
    pub status: VerdictStatus,
    /// Risk score in 0..=100; heuristic-only verdicts never exceed 99
    pub risk_score: u8,
    /// Human-readable reasons, in rule evaluation order
    pub reasons: Vec<String>,
}

impl FileVerdict {
    /// Create a new verdict.
    pub fn new(
        path: impl Into<String>,
        sha256: impl Into<String>,
        status: VerdictStatus,
        risk_score: u8,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            sha256: sha256.into(),
            status,
            risk_score,
            reasons,
        }
    }

    /// Create a clean verdict for a hashed file.
    pub fn clean(path: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self::new(path, sha256, VerdictStatus::Clean, 0, Vec::new())
    }

    /// Whether this verdict counts toward the flagged total.
    pub fn is_flagged(&self) -> bool {
        self.status != VerdictStatus::Clean
    }
}

/// What kind of target a scan covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Single file target
    File,
    /// Directory target (recursive or one level)
    Directory,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::File => "file",
            ScanMode::Directory => "directory",
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// History storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Flat JSON document append (default)
    Json,
    /// SQLite record store
    Sqlite,
}

impl StorageKind {
    /// Parse a backend name; anything that is not `sqlite` falls back to JSON.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "sqlite" => StorageKind::Sqlite,
            _ => StorageKind::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Json => "json",
            StorageKind::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary counts for a completed scan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Every unit examined, including archives and their entries
    pub files_scanned: u64,
    /// Verdicts with a non-clean status
    pub flagged: u64,
}

/// A complete scan report.
///
/// Created once per invocation, persisted to history exactly once, and
/// never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Unique scan identifier
    pub scan_id: String,
    /// When the scan started (UTC)
    pub timestamp: DateTime<Utc>,
    /// Target path as given by the caller
    pub target: String,
    /// File or directory scan
    pub mode: ScanMode,
    /// Whether heuristic rules were evaluated
    pub heuristics_enabled: bool,
    /// History backend the report was persisted to
    pub storage: StorageKind,
    /// Aggregate counts
    pub summary: ScanSummary,
    /// Wall-clock duration of the whole operation in milliseconds
    pub duration_ms: u64,
    /// Per-file verdicts in scan order
    pub results: Vec<FileVerdict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&VerdictStatus::HeuristicFlag).unwrap();
        assert_eq!(json, "\"heuristic_flag\"");
        let json = serde_json::to_string(&VerdictStatus::EicarTest).unwrap();
        assert_eq!(json, "\"eicar_test\"");
    }

    #[test]
    fn test_storage_kind_fallback() {
        assert_eq!(StorageKind::from_name("sqlite"), StorageKind::Sqlite);
        assert_eq!(StorageKind::from_name(" SQLite "), StorageKind::Sqlite);
        assert_eq!(StorageKind::from_name("json"), StorageKind::Json);
        assert_eq!(StorageKind::from_name("anything"), StorageKind::Json);
    }

    #[test]
    fn test_flagged() {
        let clean = FileVerdict::clean("/tmp/a", "abc");
        assert!(!clean.is_flagged());

        let flagged = FileVerdict::new(
            "/tmp/b",
            "def",
            VerdictStatus::HeuristicFlag,
            30,
            vec!["reason".to_string()],
        );
        assert!(flagged.is_flagged());
    }
}
