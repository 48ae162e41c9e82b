//! Shared release configuration for the Open3D distribution tooling.
//!
//! The packager and any other release helper read the package metadata and
//! the artefact filter from here so that a single `dist.toml` is the source
//! of truth for a release.

pub mod config;

pub use config::{ArtifactFilter, ConfigError, DEFAULT_CONFIG_FILE, DistConfig, PackageMetadata};
