//! Target triple validation for distribution archives.
//!
//! Only triples with a prebuilt Open3D binary are accepted.

use super::packaging_error::PackagingError;
use serde::Serialize;
use std::fmt;

/// The supported target triples.
const SUPPORTED_TARGETS: &[&str] = &[
    "x86_64-unknown-linux-gnu",
    "aarch64-unknown-linux-gnu",
    "x86_64-apple-darwin",
    "aarch64-apple-darwin",
    "x86_64-pc-windows-msvc",
];

/// A validated target triple from the supported set.
///
/// # Examples
///
/// ```
/// use open3d_packager::dist::target::TargetTriple;
///
/// let triple = TargetTriple::try_from("x86_64-unknown-linux-gnu")?;
/// assert_eq!(triple.as_str(), "x86_64-unknown-linux-gnu");
/// # Ok::<(), open3d_packager::dist::packaging_error::PackagingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TargetTriple(String);

impl TargetTriple {
    /// Returns the triple this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::UnsupportedTarget`] on hosts outside the
    /// supported set.
    pub fn host() -> Result<Self, PackagingError> {
        Self::try_from(host_triple().as_str())
    }

    /// Return the triple as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the full list of supported target triples.
    #[must_use]
    pub fn supported() -> &'static [&'static str] {
        SUPPORTED_TARGETS
    }
}

fn host_triple() -> String {
    let arch = std::env::consts::ARCH;
    match std::env::consts::OS {
        "linux" => format!("{arch}-unknown-linux-gnu"),
        "macos" => format!("{arch}-apple-darwin"),
        "windows" => format!("{arch}-pc-windows-msvc"),
        other => format!("{arch}-unknown-{other}"),
    }
}

impl TryFrom<&str> for TargetTriple {
    type Error = PackagingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if SUPPORTED_TARGETS.contains(&value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(PackagingError::UnsupportedTarget {
                value: value.to_owned(),
                expected: SUPPORTED_TARGETS.join(", "),
            })
        }
    }
}

impl AsRef<str> for TargetTriple {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
