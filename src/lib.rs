//! av-lite: an educational, offline file-risk scanner.
//!
//! This crate provides the scan pipeline: content hashing, offline
//! signature matching, explainable heuristics, one-level archive expansion,
//! directory traversal with exclusions, and scan-history persistence.
//! It is a heuristic classifier for learning purposes, not a production
//! antivirus engine.

pub mod core;
pub mod detection;
pub mod history;
pub mod scanner;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::core::types::*;
