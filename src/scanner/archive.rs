//! Archive expansion: one level deep, never further.
//!
//! ZIP/JAR containers are opened and each entry extracted into an isolated
//! scratch directory, classified, and reported under `archive!entry` paths.
//! Nested containers are flagged but never extracted, bounding recursion
//! depth at exactly one level to rule out decompression-bomb expansion.

use crate::core::types::{FileVerdict, VerdictStatus};
use crate::scanner::classifier::Classifier;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

/// Maximum uncompressed size extracted per entry (100 MiB).
const MAX_EXTRACT_SIZE: u64 = 100 * 1024 * 1024;

/// Risk score for an archive that fails to parse as a container.
const INVALID_ARCHIVE_SCORE: u8 = 25;

/// Risk score for a nested container left unexpanded.
const NESTED_ARCHIVE_SCORE: u8 = 50;

/// Risk score for an individual entry that fails extraction.
const ENTRY_FAILURE_SCORE: u8 = 10;

/// Outcome of expanding one archive.
pub struct ExpandOutcome {
    /// One verdict per examined entry, or a single synthetic verdict for
    /// the archive itself when it cannot be parsed.
    pub verdicts: Vec<FileVerdict>,
    /// Number of entries examined (zero for an unparseable archive).
    /// The archive itself is counted separately by the report builder.
    pub entries_examined: usize,
}

/// Expands container files and classifies their entries.
pub struct ArchiveExpander;

impl ArchiveExpander {
    /// Check whether a path names a supported container format.
    pub fn is_archive(path: &Path) -> bool {
        has_archive_extension(&path.to_string_lossy())
    }

    /// Expand an archive one level deep, classifying every entry.
    ///
    /// Never errors: problems with the archive or individual entries
    /// become synthetic verdicts. The scratch directory is removed on
    /// every exit path when the `TempDir` guard drops.
    pub fn expand(path: &Path, classifier: &Classifier) -> ExpandOutcome {
        let display = path.display().to_string();

        let mut archive = match File::open(path).and_then(|f| {
            ZipArchive::new(f).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }) {
            Ok(a) => a,
            Err(e) => {
                log::debug!("cannot open archive {:?}: {}", path, e);
                return ExpandOutcome {
                    verdicts: vec![FileVerdict::new(
                        display,
                        "",
                        VerdictStatus::HeuristicFlag,
                        INVALID_ARCHIVE_SCORE,
                        vec!["Invalid or corrupted archive.".to_string()],
                    )],
                    entries_examined: 0,
                };
            }
        };

        let scratch = match TempDir::new() {
            Ok(d) => d,
            Err(e) => {
                return ExpandOutcome {
                    verdicts: vec![FileVerdict::new(
                        display,
                        "",
                        VerdictStatus::HeuristicFlag,
                        ENTRY_FAILURE_SCORE,
                        vec![format!("Could not create scratch directory: {}.", e)],
                    )],
                    entries_examined: 0,
                };
            }
        };

        let mut verdicts = Vec::new();
        let mut entries_examined = 0;

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(e) => e,
                Err(e) => {
                    entries_examined += 1;
                    verdicts.push(entry_failure_verdict(
                        &display,
                        &format!("entry #{}", index),
                        &format!("Could not read archive entry: {}.", e),
                    ));
                    continue;
                }
            };

            if entry.is_dir() {
                continue;
            }
            entries_examined += 1;

            let name = entry.name().to_string();
            let member_path = format!("{}!{}", display, name);

            // Depth bound: flag nested containers, never extract them.
            if has_archive_extension(&name) {
                verdicts.push(FileVerdict::new(
                    member_path,
                    "",
                    VerdictStatus::HeuristicFlag,
                    NESTED_ARCHIVE_SCORE,
                    vec!["Nested archive not extracted (depth limit).".to_string()],
                ));
                continue;
            }

            if entry.size() > MAX_EXTRACT_SIZE {
                verdicts.push(entry_failure_verdict(
                    &display,
                    &name,
                    "Entry too large to extract.",
                ));
                continue;
            }

            // Extract under a flat unique name; entry names may contain
            // separators or traversal sequences we must not honor.
            let leaf = Path::new(&name)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("entry-{}", index));
            let extracted = scratch.path().join(format!("{}-{}", index, leaf));

            let mut content = Vec::with_capacity(entry.size() as usize);
            if let Err(e) = entry.read_to_end(&mut content) {
                verdicts.push(entry_failure_verdict(
                    &display,
                    &name,
                    &format!("Could not extract entry: {}.", e),
                ));
                continue;
            }
            if let Err(e) = std::fs::write(&extracted, &content) {
                verdicts.push(entry_failure_verdict(
                    &display,
                    &name,
                    &format!("Could not write extracted entry: {}.", e),
                ));
                continue;
            }

            let mut verdict = classifier.classify(&extracted);
            verdict.path = format!("{}!{}", display, name);
            verdicts.push(verdict);
        }

        ExpandOutcome {
            verdicts,
            entries_examined,
        }
    }
}

fn entry_failure_verdict(archive: &str, entry: &str, reason: &str) -> FileVerdict {
    FileVerdict::new(
        format!("{}!{}", archive, entry),
        "",
        VerdictStatus::HeuristicFlag,
        ENTRY_FAILURE_SCORE,
        vec![reason.to_string()],
    )
}

fn has_archive_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".zip") || lower.ends_with(".jar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::signature::SignatureSet;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::FileOptions;

    fn classifier() -> Classifier {
        Classifier::new(SignatureSet::default(), true)
    }

    fn build_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_is_archive() {
        assert!(ArchiveExpander::is_archive(Path::new("bundle.zip")));
        assert!(ArchiveExpander::is_archive(Path::new("app.JAR")));
        assert!(!ArchiveExpander::is_archive(Path::new("notes.txt")));
    }

    #[test]
    fn test_clean_entries() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("bundle.zip");
        build_zip(
            &zip_path,
            &[("readme.txt", b"hello"), ("data.csv", b"a,b,c")],
        );

        let outcome = ArchiveExpander::expand(&zip_path, &classifier());
        assert_eq!(outcome.entries_examined, 2);
        assert_eq!(outcome.verdicts.len(), 2);
        for verdict in &outcome.verdicts {
            assert_eq!(verdict.status, VerdictStatus::Clean);
            assert!(verdict.path.starts_with(&zip_path.display().to_string()));
            assert!(verdict.path.contains('!'));
        }
    }

    #[test]
    fn test_nested_archive_flagged_not_extracted() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("outer.zip");
        build_zip(
            &zip_path,
            &[("clean.txt", b"hello"), ("inner.zip", b"PK\x03\x04fake")],
        );

        let outcome = ArchiveExpander::expand(&zip_path, &classifier());
        assert_eq!(outcome.entries_examined, 2);
        assert_eq!(outcome.verdicts.len(), 2);

        let nested = outcome
            .verdicts
            .iter()
            .find(|v| v.path.ends_with("!inner.zip"))
            .unwrap();
        assert_eq!(nested.risk_score, NESTED_ARCHIVE_SCORE);
        assert_eq!(nested.status, VerdictStatus::HeuristicFlag);
        assert!(nested.reasons[0].contains("depth limit"));

        let clean = outcome
            .verdicts
            .iter()
            .find(|v| v.path.ends_with("!clean.txt"))
            .unwrap();
        assert_eq!(clean.status, VerdictStatus::Clean);
    }

    #[test]
    fn test_invalid_archive_single_verdict() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("broken.zip");
        std::fs::write(&bogus, b"this is not a zip file").unwrap();

        let outcome = ArchiveExpander::expand(&bogus, &classifier());
        assert_eq!(outcome.entries_examined, 0);
        assert_eq!(outcome.verdicts.len(), 1);
        assert_eq!(outcome.verdicts[0].risk_score, INVALID_ARCHIVE_SCORE);
        assert!(outcome.verdicts[0].reasons[0].contains("Invalid or corrupted"));
    }

    #[test]
    fn test_directory_entries_skipped() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("dirs.zip");
        let file = File::create(&zip_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.add_directory("sub/", options).unwrap();
        zip.start_file("sub/inner.txt", options).unwrap();
        zip.write_all(b"inside").unwrap();
        zip.finish().unwrap();

        let outcome = ArchiveExpander::expand(&zip_path, &classifier());
        assert_eq!(outcome.entries_examined, 1);
        assert_eq!(outcome.verdicts.len(), 1);
        assert!(outcome.verdicts[0].path.ends_with("!sub/inner.txt"));
    }

    #[test]
    fn test_flagged_entry_inside_archive() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("mixed.zip");
        build_zip(&zip_path, &[("invoice.pdf.exe", b"MZ\x90\x00body")]);

        let outcome = ArchiveExpander::expand(&zip_path, &classifier());
        assert_eq!(outcome.verdicts.len(), 1);
        let verdict = &outcome.verdicts[0];
        assert_eq!(verdict.status, VerdictStatus::HeuristicFlag);
        assert!(verdict.path.ends_with("!invoice.pdf.exe"));
        assert!(verdict.risk_score >= 25);
    }
}
