//! Flat JSON history backend: one array of reports in `scan_history.json`.

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::ScanReport;
use crate::history::HistoryStore;
use std::path::PathBuf;

/// Default history backend. The whole history lives in a single JSON
/// array; a corrupt file is reset to an empty list rather than blocking
/// further scans.
pub struct JsonHistory {
    config: Config,
}

impl JsonHistory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn path(&self) -> PathBuf {
        self.config.history_json_path()
    }

    fn read_all(&self) -> Result<Vec<ScanReport>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| Error::file_read(&path, e))?;
        match serde_json::from_str::<Vec<ScanReport>>(&contents) {
            Ok(reports) => Ok(reports),
            Err(e) => {
                log::warn!("Corrupt history file {:?} ({}), resetting", path, e);
                std::fs::write(&path, "[]").map_err(|e| Error::file_write(&path, e))?;
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, reports: &[ScanReport]) -> Result<()> {
        self.config.ensure_data_dir()?;
        let path = self.path();
        let contents = serde_json::to_string_pretty(reports)?;
        std::fs::write(&path, contents).map_err(|e| Error::file_write(&path, e))
    }
}

impl HistoryStore for JsonHistory {
    fn append_report(&self, report: &ScanReport) -> Result<()> {
        let mut reports = self.read_all()?;
        reports.push(report.clone());
        self.write_all(&reports)
    }

    fn read_recent(&self, limit: usize) -> Result<Vec<ScanReport>> {
        let mut reports = self.read_all()?;
        reports.reverse(); // stored oldest-first, served newest-first
        reports.truncate(limit);
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::StorageKind;
    use crate::history::tests::sample_report;
    use tempfile::tempdir;

    fn history(dir: &std::path::Path) -> JsonHistory {
        JsonHistory::new(Config::with_data_dir(dir))
    }

    #[test]
    fn test_append_and_read_newest_first() {
        let dir = tempdir().unwrap();
        let store = history(dir.path());

        for target in ["/a", "/b", "/c"] {
            store
                .append_report(&sample_report(target, StorageKind::Json))
                .unwrap();
        }

        let recent = store.read_recent(10).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].target, "/c");
        assert_eq!(recent[2].target, "/a");
    }

    #[test]
    fn test_limit_applies() {
        let dir = tempdir().unwrap();
        let store = history(dir.path());

        for target in ["/a", "/b", "/c"] {
            store
                .append_report(&sample_report(target, StorageKind::Json))
                .unwrap();
        }

        let recent = store.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].target, "/c");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = history(dir.path());
        assert!(store.read_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_resets() {
        let dir = tempdir().unwrap();
        let store = history(dir.path());
        std::fs::write(dir.path().join("scan_history.json"), "not json").unwrap();

        assert!(store.read_recent(10).unwrap().is_empty());

        // The file was rewritten, so appends work again
        store
            .append_report(&sample_report("/after", StorageKind::Json))
            .unwrap();
        assert_eq!(store.read_recent(10).unwrap().len(), 1);
    }
}
