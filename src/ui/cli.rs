//! Command-line interface definition.

use crate::history::DEFAULT_HISTORY_LIMIT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// av-lite: offline, educational file-risk scanner
#[derive(Parser, Debug)]
#[command(name = "av-lite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the data directory (signatures, history, settings)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a single file
    ScanFile {
        /// File to scan
        #[arg(long)]
        path: PathBuf,

        /// Evaluate heuristic rules
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        heuristics: bool,

        /// History backend (json, sqlite)
        #[arg(long, default_value = "json")]
        storage: String,
    },

    /// Scan a directory
    ScanDir {
        /// Directory to scan
        #[arg(long)]
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        recursive: bool,

        /// Evaluate heuristic rules
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        heuristics: bool,

        /// History backend (json, sqlite)
        #[arg(long, default_value = "json")]
        storage: String,
    },

    /// Merge a local signature update document
    UpdateSignatures {
        /// Signature update file (JSON)
        #[arg(long)]
        file: PathBuf,
    },

    /// Read scan history
    History {
        /// History backend (json, sqlite)
        #[arg(long, default_value = "json")]
        storage: String,

        /// Maximum number of reports returned
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
