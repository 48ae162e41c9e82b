//! Error types for geometry and image I/O.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing sample assets.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A file could not be read, parsed, or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The image codec rejected a file.
    #[error("image error on {path}: {source}")]
    Image {
        /// The image file.
        path: Utf8PathBuf,
        /// The error reported by `image`.
        #[source]
        source: ::image::ImageError,
    },

    /// The PCD codec rejected a file.
    #[error("PCD error on {path}: {source}")]
    Pcd {
        /// The PCD file.
        path: Utf8PathBuf,
        /// The error reported by `pcd-rs`.
        #[source]
        source: pcd_rs::Error,
    },

    /// The file extension names a format this reader does not handle.
    #[error("unsupported format for {path}: expected a {expected} file")]
    UnsupportedFormat {
        /// The offending file.
        path: Utf8PathBuf,
        /// The supported extensions.
        expected: &'static str,
    },

    /// A required element is absent from a PLY file.
    #[error("{path} has no {element} element")]
    MissingElement {
        /// The PLY file.
        path: Utf8PathBuf,
        /// Name of the missing element.
        element: &'static str,
    },

    /// A PCD header does not declare a required field.
    #[error("{path} has no {field} field")]
    MissingField {
        /// The PCD file.
        path: Utf8PathBuf,
        /// Name of the missing field.
        field: String,
    },

    /// An element lacks a required property.
    #[error("{path}: {element} {index} has no {property} property")]
    MissingProperty {
        /// The PLY file.
        path: Utf8PathBuf,
        /// Name of the element.
        element: &'static str,
        /// Position of the element in the file.
        index: usize,
        /// Name of the missing property.
        property: String,
    },

    /// An element holds values that do not describe valid geometry.
    #[error("{path}: {element} {index} is malformed: {reason}")]
    MalformedElement {
        /// The PLY file.
        path: Utf8PathBuf,
        /// Name of the element.
        element: &'static str,
        /// Position of the element in the file.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`GeometryError`].
pub type Result<T> = std::result::Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_property_names_the_element_and_property() {
        let err = GeometryError::MissingProperty {
            path: Utf8PathBuf::from("fragment.ply"),
            element: "vertex",
            index: 4,
            property: "z".to_owned(),
        };
        assert_eq!(err.to_string(), "fragment.ply: vertex 4 has no z property");
    }

    #[test]
    fn unsupported_format_names_the_expected_extension() {
        let err = GeometryError::UnsupportedFormat {
            path: Utf8PathBuf::from("fragment.xyz"),
            expected: ".ply or .pcd",
        };
        assert!(err.to_string().contains("expected a .ply or .pcd file"));
    }
}
