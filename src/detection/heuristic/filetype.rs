//! Lightweight magic-byte checks for extension/header mismatch detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of header bytes read for magic detection.
const HEADER_SIZE: usize = 16;

/// Known magic signatures, checked in order.
const MAGIC: &[(&str, &[u8])] = &[
    ("pe", b"MZ"), // Windows PE executables
    ("pdf", b"%PDF"),
    ("zip", b"PK\x03\x04"),
    ("png", b"\x89PNG\r\n\x1a\n"),
    ("jpg", b"\xff\xd8\xff"),
    ("gif", b"GIF8"),
];

/// Extensions with a known expected header type.
const EXT_EXPECTATIONS: &[(&str, &str)] = &[
    (".exe", "pe"),
    (".dll", "pe"),
    (".scr", "pe"),
    (".sys", "pe"),
    (".pdf", "pdf"),
    (".zip", "zip"),
    (".jar", "zip"),
    (".docx", "zip"),
    (".xlsx", "zip"),
    (".pptx", "zip"),
    (".png", "png"),
    (".jpg", "jpg"),
    (".jpeg", "jpg"),
    (".gif", "gif"),
];

/// Read the first bytes of a file for magic detection.
pub fn read_header(path: &Path) -> Option<Vec<u8>> {
    let file = File::open(path).ok()?;
    let mut header = Vec::new();
    file.take(HEADER_SIZE as u64).read_to_end(&mut header).ok()?;
    Some(header)
}

/// Detect a known file type from header bytes.
pub fn detect_magic_type(header: &[u8]) -> Option<&'static str> {
    if header.is_empty() {
        return None;
    }
    MAGIC
        .iter()
        .find(|(_, sig)| header.starts_with(sig))
        .map(|(name, _)| *name)
}

/// The header type implied by an extension, if any.
pub fn expected_type_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.to_lowercase();
    EXT_EXPECTATIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, t)| *t)
}

/// Check whether a file's extension and header bytes disagree.
///
/// Returns `(mismatch, expected, actual)`. An extension without an
/// expectation, or an unknown/unreadable header, is never a mismatch:
/// absence of evidence is not evidence.
pub fn extension_header_mismatch(
    ext: &str,
    header: Option<&[u8]>,
) -> (bool, Option<&'static str>, Option<&'static str>) {
    let expected = match expected_type_for_extension(ext) {
        Some(t) => t,
        None => return (false, None, None),
    };

    let header = match header {
        Some(h) => h,
        None => return (false, Some(expected), None),
    };

    let actual = match detect_magic_type(header) {
        Some(t) => t,
        None => return (false, Some(expected), None),
    };

    (actual != expected, Some(expected), Some(actual))
}
