//! Aggregation of per-file verdicts into a single scan report.

use crate::core::types::{FileVerdict, ScanMode, ScanReport, ScanSummary, StorageKind};
use crate::scanner::archive::ExpandOutcome;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// Accumulates verdicts for one scan invocation and captures its
/// wall-clock duration.
pub struct ReportBuilder {
    target: String,
    mode: ScanMode,
    heuristics_enabled: bool,
    storage: StorageKind,
    results: Vec<FileVerdict>,
    files_scanned: u64,
    started: Instant,
}

impl ReportBuilder {
    /// Start a report; the duration clock starts here.
    pub fn new(
        target: String,
        mode: ScanMode,
        heuristics_enabled: bool,
        storage: StorageKind,
    ) -> Self {
        Self {
            target,
            mode,
            heuristics_enabled,
            storage,
            results: Vec::new(),
            files_scanned: 0,
            started: Instant::now(),
        }
    }

    /// Record a verdict for one regular file.
    pub fn push_verdict(&mut self, verdict: FileVerdict) {
        self.files_scanned += 1;
        self.results.push(verdict);
    }

    /// Record an expanded archive. The archive itself counts as one
    /// examined unit on top of its entries.
    pub fn push_archive(&mut self, outcome: ExpandOutcome) {
        self.files_scanned += 1 + outcome.entries_examined as u64;
        self.results.extend(outcome.verdicts);
    }

    /// Finalize into an immutable report.
    pub fn finish(self) -> ScanReport {
        let flagged = self.results.iter().filter(|v| v.is_flagged()).count() as u64;
        ScanReport {
            scan_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            target: self.target,
            mode: self.mode,
            heuristics_enabled: self.heuristics_enabled,
            storage: self.storage,
            summary: ScanSummary {
                files_scanned: self.files_scanned,
                flagged,
            },
            duration_ms: self.started.elapsed().as_millis() as u64,
            results: self.results,
        }
    }
}
