//! Archive naming policy for distribution bundles.
//!
//! Archives are named `<name>-<version>-<target>.tar.zst`.

use super::target::TargetTriple;
use crate::version::VersionTriple;
use std::fmt;

/// The fixed file extension for distribution archives.
const ARCHIVE_EXTENSION: &str = ".tar.zst";

/// Extension of the checksum file written next to each archive.
const DIGEST_EXTENSION: &str = ".sha256";

/// A fully-qualified distribution archive name.
///
/// # Examples
///
/// ```
/// use open3d_packager::dist::naming::DistName;
/// use open3d_packager::dist::target::TargetTriple;
/// use open3d_packager::version::VersionTriple;
///
/// let target = TargetTriple::try_from("x86_64-unknown-linux-gnu")?;
/// let name = DistName::new("open3d", VersionTriple::new(0, 2, 0), target);
/// assert_eq!(name.filename(), "open3d-0.2.0-x86_64-unknown-linux-gnu.tar.zst");
/// # Ok::<(), open3d_packager::dist::packaging_error::PackagingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistName {
    package: String,
    version: VersionTriple,
    target: TargetTriple,
}

impl DistName {
    /// Create an archive name from its components.
    #[must_use]
    pub fn new(package: &str, version: VersionTriple, target: TargetTriple) -> Self {
        Self {
            package: package.to_owned(),
            version,
            target,
        }
    }

    /// Return the package name component.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Return the version component.
    #[must_use]
    pub const fn version(&self) -> VersionTriple {
        self.version
    }

    /// Return the target triple component.
    #[must_use]
    pub fn target(&self) -> &TargetTriple {
        &self.target
    }

    /// Return the archive file name.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }

    /// Return the file name of the checksum sidecar.
    #[must_use]
    pub fn digest_filename(&self) -> String {
        format!("{self}{DIGEST_EXTENSION}")
    }
}

impl fmt::Display for DistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}{ARCHIVE_EXTENSION}",
            self.package, self.version, self.target
        )
    }
}
