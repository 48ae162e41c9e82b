//! Core metadata (`PKG-INFO`) rendering.
//!
//! Emits version 2.1 of the Python core metadata format. Single-valued
//! fields come first, then one line per classifier and requirement, and
//! the long description forms the message body.

use crate::version::VersionTriple;
use open3d_dist::PackageMetadata;

/// File name of the core metadata document.
pub const PKG_INFO_FILE_NAME: &str = "PKG-INFO";

/// Content type of the long description, which is reStructuredText.
const DESCRIPTION_CONTENT_TYPE: &str = "text/x-rst";

/// Renders the `PKG-INFO` document for a release.
///
/// # Examples
///
/// ```
/// use open3d_dist::PackageMetadata;
/// use open3d_packager::dist::core_metadata::render_pkg_info;
/// use open3d_packager::version::VersionTriple;
///
/// let pkg_info = render_pkg_info(
///     &PackageMetadata::default(),
///     VersionTriple::new(0, 2, 0),
///     "Open3D\n======",
/// );
/// assert!(pkg_info.starts_with("Metadata-Version: 2.1\nName: open3d\nVersion: 0.2.0\n"));
/// assert!(pkg_info.ends_with("\n\nOpen3D\n======\n"));
/// ```
#[must_use]
pub fn render_pkg_info(
    metadata: &PackageMetadata,
    version: VersionTriple,
    long_description: &str,
) -> String {
    let mut out = String::new();
    push_field(&mut out, "Metadata-Version", "2.1");
    push_field(&mut out, "Name", &metadata.name);
    push_field(&mut out, "Version", &version.to_string());
    push_field(&mut out, "Summary", &metadata.description);
    push_field(&mut out, "Home-page", &metadata.url);
    push_field(&mut out, "Author", &metadata.author);
    push_field(&mut out, "Author-email", &metadata.author_email);
    push_field(&mut out, "License", &metadata.license);
    if !metadata.keywords.is_empty() {
        push_field(&mut out, "Keywords", &metadata.keywords.join(" "));
    }
    for classifier in &metadata.classifiers {
        push_field(&mut out, "Classifier", classifier);
    }
    for requirement in &metadata.install_requires {
        push_field(&mut out, "Requires-Dist", requirement);
    }
    push_field(&mut out, "Description-Content-Type", DESCRIPTION_CONTENT_TYPE);

    out.push('\n');
    out.push_str(long_description);
    out.push('\n');
    out
}

fn push_field(out: &mut String, key: &str, value: &str) {
    // Header values are single-line; fold stray newlines into spaces.
    let value = value.replace(['\r', '\n'], " ");
    out.push_str(&format!("{key}: {value}\n"));
}
