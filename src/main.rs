//! av-lite: an offline, educational file-risk scanner.
//!
//! Every invocation prints exactly one JSON payload to stdout: a scan
//! report, an operation result, or a structured error object. Exit codes:
//! 0 success, 2 invalid input, 3 permission error, 1 unexpected.

use av_lite::core::config::Config;
use av_lite::core::error::{Error, Result};
use av_lite::core::types::{ScanReport, StorageKind};
use av_lite::detection::store::SignatureStore;
use av_lite::history::open_history;
use av_lite::scanner::Scanner;
use av_lite::ui::cli::{Cli, Commands};
use av_lite::utils::logging::{init_logging, LogConfig};
use clap::CommandFactory;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(log_config);

    let config = match &cli.data_dir {
        Some(dir) => Config::with_data_dir(dir),
        None => Config::default(),
    };

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Some(Commands::ScanFile {
            path,
            heuristics,
            storage,
        }) => {
            let storage = StorageKind::from_name(&storage);
            let scanner = Scanner::new(config.clone(), heuristics, storage);
            let report = scanner.scan_file(&path)?;
            persist_and_print(&config, storage, &report)
        }
        Some(Commands::ScanDir {
            path,
            recursive,
            heuristics,
            storage,
        }) => {
            let storage = StorageKind::from_name(&storage);
            let scanner = Scanner::new(config.clone(), heuristics, storage);
            let report = scanner.scan_dir(&path, recursive)?;
            persist_and_print(&config, storage, &report)
        }
        Some(Commands::UpdateSignatures { file }) => update_signatures(&config, &file),
        Some(Commands::History { storage, limit }) => read_history(&config, &storage, limit),
        None => {
            Cli::command().print_help().map_err(|e| Error::Io(e.to_string()))?;
            Ok(())
        }
    }
}

/// Exactly one persistence call and one stdout payload per scan.
fn persist_and_print(config: &Config, storage: StorageKind, report: &ScanReport) -> Result<()> {
    open_history(config, storage).append_report(report)?;
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}

fn update_signatures(config: &Config, file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(Error::SignatureFileMissing(file.to_path_buf()));
    }

    let outcome = SignatureStore::new(config.clone()).update_from_file(file)?;
    let payload = serde_json::json!({
        "status": "ok",
        "details": format!("Added {} hashes. Total now {}.", outcome.added, outcome.total),
        "meta": outcome,
    });
    println!("{}", payload);
    Ok(())
}

fn read_history(config: &Config, storage: &str, limit: usize) -> Result<()> {
    let kind = StorageKind::from_name(storage);
    let history = open_history(config, kind).read_recent(limit)?;
    let payload = serde_json::json!({
        "status": "ok",
        "storage": kind.as_str(),
        "history": history,
    });
    println!("{}", payload);
    Ok(())
}

fn print_error(error: &Error) {
    let mut body = serde_json::json!({
        "code": error.code(),
        "message": error.to_string(),
    });
    if error.is_unexpected() {
        body["message"] = serde_json::Value::from("Unexpected error occurred.");
        body["detail"] = serde_json::Value::from(error.to_string());
    }
    let payload = serde_json::json!({ "error": body });
    println!("{}", payload);
}
