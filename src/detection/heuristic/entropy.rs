//! Shannon entropy calculation for detecting packed/obfuscated content.
//!
//! High entropy (close to 8.0 for byte data) typically indicates encrypted,
//! compressed or otherwise obfuscated content. Plain text sits around
//! 4.0-5.0.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Entropy is computed over at most the first 1 MiB of content for speed.
pub const MAX_ENTROPY_BYTES: usize = 1024 * 1024;

/// Calculate Shannon entropy (base 2) of byte data.
///
/// Returns a value between 0.0 (no randomness) and 8.0 (maximum randomness
/// for bytes).
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut frequencies = [0u64; 256];
    for &byte in data {
        frequencies[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &frequencies {
        if count > 0 {
            let probability = count as f64 / len;
            entropy -= probability * probability.log2();
        }
    }

    entropy
}

/// Compute entropy over up to [`MAX_ENTROPY_BYTES`] of a file.
///
/// Returns `None` for unreadable content; absence of an entropy signal
/// never contributes to the risk score.
pub fn file_entropy(path: &Path) -> Option<f64> {
    let file = File::open(path).ok()?;
    let mut data = Vec::new();
    file.take(MAX_ENTROPY_BYTES as u64)
        .read_to_end(&mut data)
        .ok()?;
    Some(shannon_entropy(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_zero_entropy() {
        // All same bytes = zero entropy
        let data = vec![0u8; 1000];
        assert!(shannon_entropy(&data) < 0.01);
    }

    #[test]
    fn test_max_entropy() {
        // All byte values evenly distributed = close to 8.0
        let data: Vec<u8> = (0..=255u8).collect::<Vec<_>>().repeat(4);
        assert!(shannon_entropy(&data) > 7.9);
    }

    #[test]
    fn test_text_entropy() {
        // English text typically has entropy around 4.0-5.0
        let text = b"The quick brown fox jumps over the lazy dog. This is sample text for testing entropy calculation.";
        let entropy = shannon_entropy(text);
        assert!(entropy > 3.5 && entropy < 5.5);
    }

    #[test]
    fn test_empty_data() {
        assert_eq!(shannon_entropy(&[]), 0.0);
    }

    #[test]
    fn test_file_entropy() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; 512]).unwrap();

        let entropy = file_entropy(file.path()).unwrap();
        assert!(entropy < 0.01);
    }

    #[test]
    fn test_unreadable_file_has_no_signal() {
        assert!(file_entropy(Path::new("/nonexistent/file")).is_none());
    }
}
