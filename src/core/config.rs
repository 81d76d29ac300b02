//! Configuration management for av-lite.
//!
//! The data directory is an explicit value threaded through every
//! collaborator rather than a hidden global, so tests can point each scan
//! at an isolated scratch location.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration: where signatures, history and settings live.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
        }
    }
}

impl Config {
    /// Create a configuration rooted at the given data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The default application data directory.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("av-lite")
    }

    /// The configured data directory, created on demand.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Ensure the data directory exists and return it.
    pub fn ensure_data_dir(&self) -> std::io::Result<&Path> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(&self.data_dir)
    }

    /// Path of the signature document.
    pub fn signatures_path(&self) -> PathBuf {
        self.data_dir.join("signatures.json")
    }

    /// Path of the JSON history file.
    pub fn history_json_path(&self) -> PathBuf {
        self.data_dir.join("scan_history.json")
    }

    /// Path of the SQLite history database.
    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join("scan_history.db")
    }

    /// Path of the optional settings sidecar.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Load the optional exclusion patterns from the settings sidecar.
    ///
    /// A missing or malformed settings file degrades to "no exclusions";
    /// it is never an error.
    pub fn load_exclusions(&self) -> Vec<String> {
        let path = self.settings_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Settings>(&contents) {
            Ok(settings) => settings.exclude,
            Err(e) => {
                log::warn!("Ignoring malformed settings file {:?}: {}", path, e);
                Vec::new()
            }
        }
    }
}

/// Sidecar settings document (`settings.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Exclusion patterns: path prefixes or globs containing `*`/`?`
    #[serde(default)]
    pub exclude: Vec<String>,
}
