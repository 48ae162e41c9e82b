//! Manifest shipped inside each distribution archive.
//!
//! ```json
//! {
//!   "name": "open3d",
//!   "version": "0.2.0",
//!   "target": "x86_64-unknown-linux-gnu",
//!   "generated_at": "2018-03-01T12:00:00Z",
//!   "files": [
//!     { "path": "open3d/libopen3d.so", "sha256": "..." }
//!   ]
//! }
//! ```

use super::sha256_digest::Sha256Digest;
use super::target::TargetTriple;
use super::timestamp::GeneratedAt;
use serde::Serialize;

/// Name of the manifest entry inside the archive.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// One archived file and its checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Path of the file inside the archive, `/`-separated.
    pub path: String,
    /// SHA-256 digest of the file contents.
    pub sha256: Sha256Digest,
}

/// Describes the contents of a distribution archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistManifest {
    /// Package name.
    pub name: String,
    /// Rendered version triple.
    pub version: String,
    /// Target triple the binaries were built for.
    pub target: TargetTriple,
    /// When the archive was generated.
    pub generated_at: GeneratedAt,
    /// Archived files, sorted by path.
    pub files: Vec<ManifestEntry>,
}

impl DistManifest {
    /// Returns the archive paths listed in the manifest.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|entry| entry.path.as_str()).collect()
    }

    /// Serialises the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
