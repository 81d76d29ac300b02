//! Directory traversal with exclusion pruning.
//!
//! Excluded subtrees are pruned before descent so their contents are never
//! read; a permission failure inside one subtree silently terminates that
//! subtree and never discards results already collected elsewhere.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates candidate files under a root path.
pub struct DirectoryWalker {
    recursive: bool,
    exclusions: Vec<String>,
}

impl DirectoryWalker {
    /// Create a walker. Exclusion patterns are matched case-insensitively
    /// against forward-slash-normalized paths, either as path prefixes or
    /// as glob patterns when they contain `*`/`?`.
    pub fn new(recursive: bool, exclusions: Vec<String>) -> Self {
        let exclusions = exclusions
            .into_iter()
            .map(|p| normalize(&p))
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            recursive,
            exclusions,
        }
    }

    /// Enumerate files under `root` in a deterministic order.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let depth = if self.recursive { usize::MAX } else { 1 };
        let exclusions = self.exclusions.clone();

        WalkDir::new(root)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                // Pruning here stops descent into excluded directories
                // before any of their contents are touched.
                !is_excluded(entry.path(), &exclusions)
            })
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    log::debug!("skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    }
}

fn is_excluded(path: &Path, exclusions: &[String]) -> bool {
    if exclusions.is_empty() {
        return false;
    }
    let normalized = normalize(&path.to_string_lossy());
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    exclusions.iter().any(|pattern| {
        if pattern.contains('*') || pattern.contains('?') {
            // Globs are tried against the whole path and the leaf name
            glob_match(pattern, &normalized) || glob_match(pattern, &file_name)
        } else {
            normalized == *pattern || normalized.starts_with(&format!("{}/", pattern))
        }
    })
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_end_matches('/').to_lowercase()
}

/// Recursive glob matching over `*` and `?`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut p_chars = pattern.chars().peekable();
    let mut t_chars = text.chars().peekable();

    while let Some(p) = p_chars.next() {
        match p {
            '*' => {
                let remaining_pattern: String = p_chars.collect();
                if remaining_pattern.is_empty() {
                    return true;
                }

                let remaining_text: String = t_chars.collect();
                for (i, _) in remaining_text.char_indices() {
                    if glob_match(&remaining_pattern, &remaining_text[i..]) {
                        return true;
                    }
                }
                return glob_match(&remaining_pattern, "");
            }
            '?' => {
                if t_chars.next().is_none() {
                    return false;
                }
            }
            c => {
                if t_chars.next() != Some(c) {
                    return false;
                }
            }
        }
    }

    t_chars.next().is_none()
}
