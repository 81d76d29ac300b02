//! SQLite history backend.
//!
//! Each report is one row in the `scans` table: denormalized summary
//! columns for cheap querying plus the full report as JSON for faithful
//! round-trips.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::ScanReport;
use crate::history::HistoryStore;
use rusqlite::{params, Connection};

/// Alternate history backend in `scan_history.db`.
pub struct SqliteHistory {
    config: Config,
}

impl SqliteHistory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn open(&self) -> Result<Connection> {
        self.config.ensure_data_dir()?;
        let conn = Connection::open(self.config.history_db_path())?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS scans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                target TEXT NOT NULL,
                mode TEXT NOT NULL,
                heuristics_enabled INTEGER NOT NULL,
                storage TEXT NOT NULL,
                files_scanned INTEGER NOT NULL,
                flagged INTEGER NOT NULL,
                report_json TEXT NOT NULL
            )",
            [],
        )?;
        Ok(conn)
    }
}

impl HistoryStore for SqliteHistory {
    fn append_report(&self, report: &ScanReport) -> Result<()> {
        let conn = self.open()?;
        let report_json = serde_json::to_string(report)?;
        conn.execute(
            "INSERT INTO scans (
                timestamp, target, mode, heuristics_enabled, storage,
                files_scanned, flagged, report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                report.timestamp.to_rfc3339(),
                report.target,
                report.mode.as_str(),
                report.heuristics_enabled as i64,
                report.storage.as_str(),
                report.summary.files_scanned as i64,
                report.summary.flagged as i64,
                report_json,
            ],
        )?;
        Ok(())
    }

    fn read_recent(&self, limit: usize) -> Result<Vec<ScanReport>> {
        let conn = self.open()?;
        let mut stmt =
            conn.prepare("SELECT report_json FROM scans ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;

        let mut reports = Vec::new();
        for row in rows {
            let raw = row?;
            match serde_json::from_str::<ScanReport>(&raw) {
                Ok(report) => reports.push(report),
                Err(e) => log::warn!("Skipping undecodable history row: {}", e),
            }
        }
        Ok(reports)
    }
}
