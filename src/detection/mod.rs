//! Detection engines: offline signature matching and heuristic analysis.

pub mod heuristic;
pub mod signature;
pub mod store;

pub use heuristic::{evaluate_heuristics, HeuristicReport, Signals};
pub use signature::{SignatureDocument, SignatureSet};
pub use store::{MergeOutcome, SignatureStore};
