//! Download logic for external tool releases.
//!
//! Provides a trait-based abstraction so tests can stand in for HTTP
//! without network access.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for tool downloads. Converter releases run to tens of
/// megabytes, so this is generous.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads release assets.
///
/// # Examples
///
/// ```no_run
/// use open3d_packager::tools::download::{HttpDownloader, ToolDownloader};
/// use std::path::Path;
///
/// HttpDownloader.download(
///     "https://github.com/jgm/pandoc/releases/download/3.1.11/pandoc-3.1.11-linux-amd64.tar.gz",
///     Path::new("/tmp/pandoc.tar.gz"),
/// )?;
/// # Ok::<(), open3d_packager::tools::download::DownloadError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ToolDownloader {
    /// Downloads `url` into the file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from downloading or unpacking a tool release.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested asset was not found (HTTP 404).
    #[error("release asset not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),

    /// The downloaded archive could not be unpacked.
    #[error("failed to unpack {archive}: {reason}")]
    Extraction {
        /// File name of the archive.
        archive: String,
        /// Description of the failure.
        reason: String,
    },
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ToolDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
        Ok(())
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
