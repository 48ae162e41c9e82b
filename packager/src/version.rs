//! Version extraction from the CMake build configuration.
//!
//! `CMakeLists.txt` declares the release version as three labelled values:
//!
//! ```text
//! set(OPEN3D_VERSION_MAJOR "0")
//! set(OPEN3D_VERSION_MINOR "2")
//! set(OPEN3D_VERSION_PATCH "0")
//! ```
//!
//! The labels are located by pattern, not by a CMake parser. When a label
//! appears more than once, the last occurrence wins.

use crate::error::{PackagerError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Release version as `(major, minor, patch)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTriple {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl VersionTriple {
    /// Creates a version triple.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extracts the version triple from build configuration text.
///
/// `prefix` is the label prefix, `OPEN3D` for `OPEN3D_VERSION_MAJOR`.
///
/// # Errors
///
/// Returns [`PackagerError::MissingVersionField`] naming the first absent
/// field, or [`PackagerError::InvalidVersionField`] when a value does not fit
/// in a `u32`.
///
/// # Examples
///
/// ```
/// use open3d_packager::version::extract_version;
///
/// let text = concat!(
///     "set(OPEN3D_VERSION_MAJOR \"0\")\n",
///     "set(OPEN3D_VERSION_MINOR \"2\")\n",
///     "set(OPEN3D_VERSION_PATCH \"1\")\n",
/// );
/// let version = extract_version(text, "OPEN3D").expect("all fields present");
/// assert_eq!(version.to_string(), "0.2.1");
/// ```
pub fn extract_version(config_text: &str, prefix: &str) -> Result<VersionTriple> {
    let fields = version_fields(config_text, prefix);

    Ok(VersionTriple {
        major: field_value(&fields, "MAJOR")?,
        minor: field_value(&fields, "MINOR")?,
        patch: field_value(&fields, "PATCH")?,
    })
}

/// Collects every `<prefix>_VERSION_<label> "<digits>"` pair.
fn version_fields<'a>(config_text: &'a str, prefix: &str) -> HashMap<&'a str, &'a str> {
    let pattern = format!(
        r#"{}_VERSION_([^ \t]+)[ \t]+"([0-9]+)""#,
        regex::escape(prefix)
    );
    // An empty map reports every field as missing.
    let Ok(regex) = Regex::new(&pattern) else {
        return HashMap::new();
    };

    regex
        .captures_iter(config_text)
        .map(|captures| {
            let (_, [label, value]) = captures.extract();
            (label, value)
        })
        .collect()
}

fn field_value(fields: &HashMap<&str, &str>, field: &'static str) -> Result<u32> {
    let raw = fields
        .get(field)
        .ok_or(PackagerError::MissingVersionField { field })?;

    raw.parse().map_err(|_| PackagerError::InvalidVersionField {
        field,
        value: (*raw).to_owned(),
    })
}
