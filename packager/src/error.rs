//! Error types for the Open3D packager CLI.
//!
//! Every variant aborts the run. Variants carry enough context to tell the
//! user which input was missing or which external step failed.

use crate::dist::packaging_error::PackagingError;
use crate::tools::download::DownloadError;
use camino::Utf8PathBuf;
use open3d_dist::ConfigError;
use thiserror::Error;

/// Errors that can occur while packaging a release.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Staging was requested without an artefact search root.
    #[error("you must specify the base directory using the --base-dir argument")]
    MissingBaseDir,

    /// A version label was not found in the build configuration.
    #[error("version field {field} not found in build configuration")]
    MissingVersionField {
        /// Name of the missing field (`MAJOR`, `MINOR` or `PATCH`).
        field: &'static str,
    },

    /// A version label holds a value that does not fit the version triple.
    #[error("version field {field} has invalid value \"{value}\"")]
    InvalidVersionField {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value found in the configuration text.
        value: String,
    },

    /// No compiled binaries were found to package.
    #[error("no package data found under {base_dir}")]
    EmptyArtifactSet {
        /// The directory that was searched.
        base_dir: Utf8PathBuf,
    },

    /// A document could not be converted, even after installing the
    /// converter.
    #[error("failed to convert {path}: {reason}")]
    ConversionFailed {
        /// Path of the document being converted.
        path: Utf8PathBuf,
        /// Description of the converter failure.
        reason: String,
    },

    /// Required tool installation failed.
    #[error("failed to install {tool}: {message}")]
    DependencyInstall {
        /// Name of the tool that failed to install.
        tool: &'static str,
        /// Description of the installation failure.
        message: String,
    },

    /// An external command did not finish in time.
    #[error("{command} timed out after {seconds} seconds")]
    CommandTimeout {
        /// The program that was run.
        command: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// Copying files into the package directory failed.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// Description of the staging failure.
        reason: String,
    },

    /// The release configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The distribution archive could not be assembled.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// Downloading or unpacking a tool failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
