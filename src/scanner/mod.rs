//! The scan pipeline: walker, classifier, archive expander, report builder.

pub mod archive;
pub mod classifier;
pub mod report;
pub mod walker;

pub use archive::{ArchiveExpander, ExpandOutcome};
pub use classifier::Classifier;
pub use report::ReportBuilder;
pub use walker::DirectoryWalker;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{ScanMode, ScanReport, StorageKind};
use crate::detection::store::SignatureStore;
use std::path::Path;

/// Drives a scan invocation end to end.
///
/// Loads the signature set once, then feeds candidate files through the
/// classifier (or the archive expander for containers) and aggregates
/// verdicts into a single report. The report is returned, never persisted
/// here; history storage is the caller's concern.
pub struct Scanner {
    config: Config,
    heuristics_enabled: bool,
    storage: StorageKind,
}

impl Scanner {
    pub fn new(config: Config, heuristics_enabled: bool, storage: StorageKind) -> Self {
        Self {
            config,
            heuristics_enabled,
            storage,
        }
    }

    /// Scan a single file or archive.
    pub fn scan_file(&self, path: &Path) -> Result<ScanReport> {
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let classifier = self.classifier()?;
        let mut builder = ReportBuilder::new(
            path.display().to_string(),
            ScanMode::File,
            self.heuristics_enabled,
            self.storage,
        );

        self.scan_one(path, &classifier, &mut builder);

        let report = builder.finish();
        log::info!(
            "scan of {:?} finished: {} file(s), {} flagged",
            path,
            report.summary.files_scanned,
            report.summary.flagged
        );
        Ok(report)
    }

    /// Scan a directory tree (or just its top level).
    pub fn scan_dir(&self, path: &Path, recursive: bool) -> Result<ScanReport> {
        if !path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        let classifier = self.classifier()?;
        let walker = DirectoryWalker::new(recursive, self.config.load_exclusions());
        let mut builder = ReportBuilder::new(
            path.display().to_string(),
            ScanMode::Directory,
            self.heuristics_enabled,
            self.storage,
        );

        for file in walker.walk(path) {
            self.scan_one(&file, &classifier, &mut builder);
        }

        let report = builder.finish();
        log::info!(
            "scan of {:?} finished: {} file(s), {} flagged",
            path,
            report.summary.files_scanned,
            report.summary.flagged
        );
        Ok(report)
    }

    fn scan_one(&self, path: &Path, classifier: &Classifier, builder: &mut ReportBuilder) {
        if ArchiveExpander::is_archive(path) {
            builder.push_archive(ArchiveExpander::expand(path, classifier));
        } else {
            builder.push_verdict(classifier.classify(path));
        }
    }

    fn classifier(&self) -> Result<Classifier> {
        let signatures = SignatureStore::new(self.config.clone()).load_set()?;
        Ok(Classifier::new(signatures, self.heuristics_enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VerdictStatus;
    use std::io::Write;
    use tempfile::tempdir;

    fn scanner(data_dir: &Path) -> Scanner {
        Scanner::new(Config::with_data_dir(data_dir), true, StorageKind::Json)
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_scan_file_clean() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();
        let path = write_file(target.path(), "notes.txt", b"ordinary content");

        let report = scanner(data.path()).scan_file(&path).unwrap();
        assert_eq!(report.mode, ScanMode::File);
        assert_eq!(report.summary.files_scanned, 1);
        assert_eq!(report.summary.flagged, 0);
        assert_eq!(report.results[0].status, VerdictStatus::Clean);
    }

    #[test]
    fn test_scan_file_rejects_directory() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();

        let err = scanner(data.path()).scan_file(target.path()).unwrap_err();
        assert_eq!(err.code(), "invalid_target");
    }

    #[test]
    fn test_scan_dir_rejects_file() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();
        let path = write_file(target.path(), "file.txt", b"x");

        let err = scanner(data.path()).scan_dir(&path, true).unwrap_err();
        assert_eq!(err.code(), "invalid_target");
    }

    #[test]
    fn test_scan_dir_mixed_contents() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();
        write_file(target.path(), "clean.txt", b"ordinary text content");
        write_file(target.path(), "invoice.pdf.exe", b"MZ\x90\x00body");

        let report = scanner(data.path()).scan_dir(target.path(), true).unwrap();
        assert_eq!(report.summary.files_scanned, 2);
        assert_eq!(report.summary.flagged, 1);

        let flagged = report.results.iter().find(|v| v.is_flagged()).unwrap();
        assert!(flagged.path.ends_with("invoice.pdf.exe"));
        assert!(flagged.reasons.iter().any(|r| r.contains("masquerading")));
        assert!(flagged
            .reasons
            .iter()
            .any(|r| r.contains("Extension/header mismatch")));
    }

    #[test]
    fn test_scan_dir_expands_archives() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();

        let zip_path = target.path().join("bundle.zip");
        {
            let file = std::fs::File::create(&zip_path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file("inner.txt", options).unwrap();
            zip.write_all(b"inside").unwrap();
            zip.start_file("nested.zip", options).unwrap();
            zip.write_all(b"PK\x03\x04fake").unwrap();
            zip.finish().unwrap();
        }

        let report = scanner(data.path()).scan_dir(target.path(), false).unwrap();
        // archive itself + two entries
        assert_eq!(report.summary.files_scanned, 3);
        assert_eq!(report.results.len(), 2);

        let nested = report
            .results
            .iter()
            .find(|v| v.path.ends_with("!nested.zip"))
            .unwrap();
        assert_eq!(nested.risk_score, 50);
    }

    #[test]
    fn test_scan_file_reports_are_deterministic() {
        let data = tempdir().unwrap();
        let target = tempdir().unwrap();
        let path = write_file(target.path(), "stable.txt", b"fixed bytes");

        let s = scanner(data.path());
        let first = s.scan_file(&path).unwrap();
        let second = s.scan_file(&path).unwrap();

        assert_eq!(first.results[0].sha256, second.results[0].sha256);
        assert_eq!(first.results[0].status, second.results[0].status);
        assert_ne!(first.scan_id, second.scan_id);
    }
}
