//! Scan history persistence.
//!
//! Two interchangeable backends behind one trait: a flat JSON document
//! (default) and a SQLite record store. Reports are appended exactly once
//! per scan invocation and read back newest-first.

pub mod json;
pub mod sqlite;

pub use json::JsonHistory;
pub use sqlite::SqliteHistory;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{ScanReport, StorageKind};

/// Default number of reports returned by a history read.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Append-only store of scan reports.
pub trait HistoryStore {
    /// Persist one finished report.
    fn append_report(&self, report: &ScanReport) -> Result<()>;

    /// Read up to `limit` reports, newest first.
    fn read_recent(&self, limit: usize) -> Result<Vec<ScanReport>>;
}

/// Select the backend for a storage tag.
pub fn open_history(config: &Config, kind: StorageKind) -> Box<dyn HistoryStore> {
    match kind {
        StorageKind::Sqlite => Box::new(SqliteHistory::new(config.clone())),
        StorageKind::Json => Box::new(JsonHistory::new(config.clone())),
    }
}
