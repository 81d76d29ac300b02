//! Heuristic evaluation: cheap, explainable scoring rules.
//!
//! Each rule is an independent pure function over a prepared
//! [`RuleContext`] and returns a partial score with human-readable reasons.
//! Rules are held in a fixed ordered table so the reasons list is stable
//! and each rule can be unit tested on its own. The combined score is
//! capped at 99: heuristics alone never reach the score reserved for a
//! direct signature match.

pub mod entropy;
pub mod filetype;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Heuristic-only scores are capped below the signature-match score of 100.
pub const HEURISTIC_SCORE_CAP: u32 = 99;

/// Entropy at or above this threshold suggests packing or obfuscation.
pub const ENTROPY_THRESHOLD: f64 = 7.2;

/// Extensions of executable/script content.
const SUSPICIOUS_EXTENSIONS: &[&str] = &[
    ".exe", ".scr", ".js", ".vbs", ".bat", ".cmd", ".ps1", ".dll", ".jar",
];

/// Extensions commonly used as the "document" half of a masquerading chain.
const BENIGN_DOC_LIKE: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt", ".rtf",
];

/// Common urgency/bait terms seen in lure filenames.
const LURE_TERMS: &[&str] = &[
    "invoice", "urgent", "payment", "security", "update", "scan", "statement",
];

/// Script/executable extensions considered in the lure-term rule.
const LURE_EXECUTABLE_EXTS: &[&str] = &[".exe", ".scr", ".js", ".vbs", ".ps1", ".bat"];

/// Prepared inputs shared by all rules: name, extension, header bytes and
/// content entropy. Built once per file so every rule stays pure.
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// File name including extension(s)
    pub file_name: String,
    /// Final extension with leading dot, lowercased; empty when absent
    pub extension: String,
    /// First header bytes, when readable
    pub header: Option<Vec<u8>>,
    /// Shannon entropy over the first 1 MiB, when readable
    pub entropy: Option<f64>,
}

impl RuleContext {
    /// Build the context for a file on disk.
    pub fn for_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        Self {
            file_name,
            extension,
            header: filetype::read_header(path),
            entropy: entropy::file_entropy(path),
        }
    }
}

/// Partial outcome of a single rule.
#[derive(Debug, Clone, Default)]
pub struct RuleHit {
    pub score: u32,
    pub reasons: Vec<String>,
}

impl RuleHit {
    fn none() -> Self {
        Self::default()
    }

    fn new(score: u32, reason: impl Into<String>) -> Self {
        Self {
            score,
            reasons: vec![reason.into()],
        }
    }
}

/// A named heuristic rule.
pub type Rule = fn(&RuleContext) -> RuleHit;

/// The fixed, ordered rule table. Reason strings preserve this order.
pub const RULES: &[(&str, Rule)] = &[
    ("suspicious_extension", suspicious_extension),
    ("double_extension", double_extension),
    ("name_anomalies", name_anomalies),
    ("header_mismatch", header_mismatch),
    ("entropy", high_entropy),
];

/// Combined heuristic result for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicReport {
    /// Summed rule scores, capped at 99
    pub risk_score: u8,
    /// Reasons in rule evaluation order
    pub reasons: Vec<String>,
    /// Raw signals for reporting
    pub signals: Signals,
}

/// Raw signals observed during evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signals {
    /// Final extension, lowercased
    pub extension: String,
    /// Content entropy, absent when unreadable
    pub entropy: Option<f64>,
}

/// Evaluate all heuristic rules for a file.
///
/// Never errors: unreadable content simply contributes nothing.
pub fn evaluate_heuristics(path: &Path) -> HeuristicReport {
    let ctx = RuleContext::for_path(path);
    evaluate_context(&ctx)
}

/// Evaluate the rule table over a prepared context.
pub fn evaluate_context(ctx: &RuleContext) -> HeuristicReport {
    let mut score: u32 = 0;
    let mut reasons = Vec::new();

    for (name, rule) in RULES {
        let hit = rule(ctx);
        if hit.score > 0 {
            log::trace!("rule {} scored {} for {}", name, hit.score, ctx.file_name);
        }
        score += hit.score;
        reasons.extend(hit.reasons);
    }

    HeuristicReport {
        risk_score: score.min(HEURISTIC_SCORE_CAP) as u8,
        reasons,
        signals: Signals {
            extension: ctx.extension.clone(),
            entropy: ctx.entropy,
        },
    }
}

/// Rule 1: fixed set of executable/script extensions.
fn suspicious_extension(ctx: &RuleContext) -> RuleHit {
    if SUSPICIOUS_EXTENSIONS.contains(&ctx.extension.as_str()) {
        RuleHit::new(
            12,
            format!("Suspicious or high-risk extension: {}.", ctx.extension),
        )
    } else {
        RuleHit::none()
    }
}

/// Rule 2: multi-extension chains, with a higher score when a document-like
/// extension is combined with an executable one.
fn double_extension(ctx: &RuleContext) -> RuleHit {
    let lower = ctx.file_name.to_lowercase();
    let parts: Vec<&str> = lower.split('.').collect();

    // name.ext1.ext2 at minimum
    if parts.len() < 3 {
        return RuleHit::none();
    }

    let exts: Vec<String> = parts[1..].iter().map(|p| format!(".{}", p)).collect();
    let has_doc_like = exts.iter().any(|e| BENIGN_DOC_LIKE.contains(&e.as_str()));
    let has_suspicious = exts
        .iter()
        .any(|e| SUSPICIOUS_EXTENSIONS.contains(&e.as_str()));

    if has_doc_like && has_suspicious {
        RuleHit::new(
            25,
            "Possible double-extension masquerading (e.g., document name ending with executable/script).",
        )
    } else {
        RuleHit::new(12, "Multiple extensions detected (could be masquerading).")
    }
}

/// Rule 3: simple, explainable naming anomalies.
fn name_anomalies(ctx: &RuleContext) -> RuleHit {
    let mut hit = RuleHit::none();
    let name = &ctx.file_name;
    let lower = name.to_lowercase();

    // Lots of dots can be suspicious
    if lower.matches('.').count() >= 3 {
        hit.score += 8;
        hit.reasons
            .push("Unusually many dots in filename.".to_string());
    }

    if name != name.trim() {
        hit.score += 10;
        hit.reasons
            .push("Filename has leading/trailing whitespace.".to_string());
    }

    let has_lure = LURE_TERMS.iter().any(|t| lower.contains(t));
    let has_exec_ext = LURE_EXECUTABLE_EXTS.iter().any(|e| lower.contains(e));
    if has_lure && has_exec_ext {
        hit.score += 6;
        hit.reasons.push(
            "Filename contains common lure terms combined with a script/executable extension."
                .to_string(),
        );
    }

    hit
}

/// Rule 4: an extension implies a type the header bytes contradict.
///
/// For multi-extension names every extension in the chain is checked, so
/// `invoice.pdf.exe` with a PE header still trips on the `.pdf` claim.
fn header_mismatch(ctx: &RuleContext) -> RuleHit {
    for ext in candidate_extensions(ctx) {
        let (mismatch, expected, actual) =
            filetype::extension_header_mismatch(&ext, ctx.header.as_deref());
        if mismatch {
            return RuleHit::new(
                30,
                format!(
                    "Extension/header mismatch: expected {}, found {}.",
                    expected.unwrap_or("?"),
                    actual.unwrap_or("?")
                ),
            );
        }
    }
    RuleHit::none()
}

/// Extensions whose type claims are checked against the header: the full
/// chain for multi-extension names, otherwise just the final extension.
fn candidate_extensions(ctx: &RuleContext) -> Vec<String> {
    let lower = ctx.file_name.to_lowercase();
    let parts: Vec<&str> = lower.split('.').collect();
    if parts.len() >= 3 {
        parts[1..].iter().map(|p| format!(".{}", p)).collect()
    } else if !ctx.extension.is_empty() {
        vec![ctx.extension.clone()]
    } else {
        Vec::new()
    }
}

/// Rule 5: high content entropy.
fn high_entropy(ctx: &RuleContext) -> RuleHit {
    match ctx.entropy {
        Some(ent) if ent >= ENTROPY_THRESHOLD => RuleHit::new(
            18,
            format!("High entropy ({:.2}) may indicate packing or obfuscation.", ent),
        ),
        _ => RuleHit::none(),
    }
}
