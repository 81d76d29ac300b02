//! Error types and result handling for av-lite.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for av-lite operations.
///
/// Only invocation-level failures surface here. Per-file problems
/// (unreadable file, corrupt archive, failed extraction) are converted into
/// low-confidence flagged verdicts inside the pipeline so a single bad file
/// never aborts a scan.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Target path is not a readable file: {0:?}")]
    NotAFile(PathBuf),

    #[error("Target path is not a readable directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Signature update file does not exist or is not a file: {0:?}")]
    SignatureFileMissing(PathBuf),

    #[error("{0}")]
    SignatureValidation(String),

    #[error("Permission denied: {path:?}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0:?}")]
    PathNotFound(PathBuf),

    #[error("Failed to read file: {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path:?}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON serialization error")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Error {
    /// Create a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Classify an I/O error against a path, picking the permission variant
    /// when the underlying cause warrants the dedicated exit code.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            std::io::ErrorKind::NotFound => Self::PathNotFound(path),
            _ => Self::FileRead { path, source },
        }
    }

    /// Stable error code reported in the JSON error payload.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotAFile(_) | Error::NotADirectory(_) => "invalid_target",
            Error::SignatureFileMissing(_) => "invalid_signature_file",
            Error::SignatureValidation(_) => "validation_error",
            Error::PermissionDenied { .. } => "permission_error",
            Error::PathNotFound(_) => "not_found",
            _ => "unexpected",
        }
    }

    /// Process exit code: 2 invalid input, 3 permission, 1 unexpected.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotAFile(_)
            | Error::NotADirectory(_)
            | Error::SignatureFileMissing(_)
            | Error::SignatureValidation(_)
            | Error::PathNotFound(_) => 2,
            Error::PermissionDenied { .. } => 3,
            _ => 1,
        }
    }

    /// Whether this error carries a diagnostic detail field in its payload.
    pub fn is_unexpected(&self) -> bool {
        self.code() == "unexpected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::NotAFile(PathBuf::from("/test/path"));
        assert_eq!(err.code(), "invalid_target");
        assert_eq!(err.exit_code(), 2);

        let err = Error::SignatureValidation("bad schema".to_string());
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.exit_code(), 2);

        let err = Error::Io("boom".to_string());
        assert_eq!(err.code(), "unexpected");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_permission_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from_io("/root/secret", io);
        assert_eq!(err.code(), "permission_error");
        assert_eq!(err.exit_code(), 3);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from_io("/missing", io);
        assert_eq!(err.code(), "not_found");
    }
}
