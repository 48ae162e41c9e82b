//! Release configuration loader backed by `dist.toml`.
//!
//! The packaging tools keep the descriptive package metadata and the binary
//! artefact filter in a single `dist.toml` next to the packaging project.
//! Every field is optional: values that are not overridden fall back to the
//! Open3D release defaults, and a missing file yields the defaults outright.
//! Unknown keys are rejected so that typos surface as errors instead of being
//! silently ignored.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the project directory when no explicit path is
/// supplied.
pub const DEFAULT_CONFIG_FILE: &str = "dist.toml";

/// Errors raised while loading `dist.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// The deserialisation error reported by `toml`.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level release configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DistConfig {
    /// Descriptive metadata recorded in the distribution.
    pub package: PackageMetadata,
    /// Filter used to recognise compiled binary artefacts.
    pub artifacts: ArtifactFilter,
}

impl DistConfig {
    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file exists but cannot be read
    /// and [`ConfigError::Parse`] when its contents do not deserialise.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use open3d_dist::DistConfig;
    ///
    /// let config = DistConfig::load_from(Utf8Path::new("/nonexistent/dist.toml"))
    ///     .expect("missing files fall back to defaults");
    /// assert_eq!(config.package.name, "open3d");
    /// ```
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no release configuration at {path}; using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns the `toml` deserialisation error for malformed input.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Returns the name marker used to match artefact file names.
    ///
    /// An explicit `artifacts.name_marker` wins; otherwise the package name is
    /// used, so `open3d` matches `libopen3d.so` and `open3d.dll`.
    #[must_use]
    pub fn name_marker(&self) -> &str {
        self.artifacts
            .name_marker
            .as_deref()
            .map(str::trim)
            .filter(|marker| !marker.is_empty())
            .unwrap_or_else(|| self.package.name.as_str())
    }

    /// Returns the prefix of the version labels in `CMakeLists.txt`.
    ///
    /// Defaults to the upper-cased package name (`OPEN3D`).
    #[must_use]
    pub fn version_prefix(&self) -> String {
        self.package
            .version_prefix
            .clone()
            .unwrap_or_else(|| self.package.name.to_uppercase())
    }
}

/// Descriptive package metadata.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackageMetadata {
    /// Distribution name; also the package directory name.
    pub name: String,
    /// Prefix of the `<PREFIX>_VERSION_<FIELD>` labels. Derived from the
    /// name when omitted.
    pub version_prefix: Option<String>,
    /// Author shown in the core metadata.
    pub author: String,
    /// Contact address for the author.
    pub author_email: String,
    /// One-line summary.
    pub description: String,
    /// Licence identifier.
    pub license: String,
    /// Project home page.
    pub url: String,
    /// Search keywords.
    pub keywords: Vec<String>,
    /// Trove classifiers.
    pub classifiers: Vec<String>,
    /// Runtime requirements of the packaged bindings.
    pub install_requires: Vec<String>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "open3d".to_owned(),
            version_prefix: None,
            author: "Open3D community".to_owned(),
            author_email: "info@open-3d.org".to_owned(),
            description: "Open3D: A Modern Library for 3D Data Processing".to_owned(),
            license: "MIT".to_owned(),
            url: "http://www.open-3d.org".to_owned(),
            keywords: to_owned_list(&[
                "computer-vision",
                "3d-reconstruction",
                "3d-graphics",
                "python-bindings",
                "rgbd",
                "pointcloud",
            ]),
            classifiers: to_owned_list(DEFAULT_CLASSIFIERS),
            install_requires: to_owned_list(&["numpy"]),
        }
    }
}

const DEFAULT_CLASSIFIERS: &[&str] = &[
    "Development Status :: 3 - Alpha",
    "Operating System :: Microsoft :: Windows",
    "Operating System :: MacOS",
    "Operating System :: POSIX :: Linux",
    "Programming Language :: C++",
    "Programming Language :: Python",
    "Topic :: Utilities",
    "Topic :: Scientific/Engineering",
    "Topic :: Software Development :: Libraries",
    "Topic :: Multimedia :: Graphics :: 3D Modeling",
    "Topic :: Multimedia :: Graphics :: Viewers",
    "Environment :: Win32 (MS Windows)",
    "Environment :: MacOS X",
    "Environment :: X11 Applications",
    "Intended Audience :: Developers",
    "Intended Audience :: Science/Research",
    "Natural Language :: English",
    "License :: OSI Approved :: MIT License",
];

/// Filter describing which files count as compiled binary artefacts.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactFilter {
    /// Accepted file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Substring a file name must contain. Defaults to the package name.
    pub name_marker: Option<String>,
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self {
            extensions: to_owned_list(&["dll", "dylib", "pyd", "so"]),
            name_marker: None,
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_the_open3d_release() {
        let config = DistConfig::default();

        assert_eq!(config.package.name, "open3d");
        assert_eq!(config.package.license, "MIT");
        assert_eq!(config.package.classifiers.len(), 18);
        assert_eq!(config.artifacts.extensions, ["dll", "dylib", "pyd", "so"]);
        assert_eq!(config.name_marker(), "open3d");
        assert_eq!(config.version_prefix(), "OPEN3D");
    }

    #[rstest]
    fn deserialises_partial_overrides() {
        let source = "[package]\nname = \"pyvox\"\nauthor = \"Voxel team\"\n";

        let config = DistConfig::parse(source).expect("expected configuration to parse");

        assert_eq!(config.package.name, "pyvox");
        assert_eq!(config.package.author, "Voxel team");
        assert_eq!(config.package.license, "MIT");
        assert_eq!(config.version_prefix(), "PYVOX");
    }

    #[rstest]
    #[case::explicit("name_marker = \"core\"", "core")]
    #[case::blank("name_marker = \"  \"", "open3d")]
    fn name_marker_prefers_explicit_non_blank_values(#[case] line: &str, #[case] expected: &str) {
        let source = format!("[artifacts]\n{line}\n");

        let config = DistConfig::parse(&source).expect("expected configuration to parse");

        assert_eq!(config.name_marker(), expected);
    }

    #[rstest]
    fn explicit_version_prefix_wins() {
        let source = "[package]\nversion_prefix = \"O3D\"\n";

        let config = DistConfig::parse(source).expect("expected configuration to parse");

        assert_eq!(config.version_prefix(), "O3D");
    }

    #[rstest]
    fn rejects_unknown_fields() {
        let outcome = DistConfig::parse("unexpected = true\n");

        assert!(outcome.is_err(), "expected unknown fields to be rejected");
    }

    #[rstest]
    fn load_from_reports_parse_errors_with_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("dist.toml")).expect("utf-8 path");
        std::fs::write(&path, "[artifacts]\nextensions = 3\n").expect("write config");

        let err = DistConfig::load_from(&path).expect_err("expected a parse error");

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("dist.toml"));
    }
}
