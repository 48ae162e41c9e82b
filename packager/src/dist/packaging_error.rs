//! Error types for distribution packaging.
//!
//! Covers I/O failures, serialization problems, and validation errors that
//! can occur while writing core metadata and assembling the archive.

use thiserror::Error;

/// Errors arising from distribution packaging.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// An I/O operation failed (reading staged files, writing the archive).
    #[error("I/O error during packaging: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of the manifest failed.
    #[error("manifest serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The package directory holds no files to archive.
    #[error("no files found in package directory {0}")]
    EmptyFileList(camino::Utf8PathBuf),

    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidDigest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The target triple is not in the supported set.
    #[error("unsupported target triple \"{value}\"; expected one of: {expected}")]
    UnsupportedTarget {
        /// The rejected triple string.
        value: String,
        /// Comma-separated list of accepted triples.
        expected: String,
    },

    /// A generation timestamp is not in `YYYY-MM-DDThh:mm:ssZ` form.
    #[error("invalid timestamp \"{0}\"; expected YYYY-MM-DDThh:mm:ssZ")]
    InvalidTimestamp(String),
}
