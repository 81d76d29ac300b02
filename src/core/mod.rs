//! Core functionality: configuration, error handling, and shared types.

pub mod config;
pub mod error;
pub mod types;
