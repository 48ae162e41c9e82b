//! Open3D packager library.
//!
//! This crate reads the release version and long description from an Open3D
//! source tree, stages compiled binaries into the package directory, and
//! assembles the redistributable archive. It is used by the
//! `open3d-packager` CLI binary and can be driven programmatically for
//! testing.
//!
//! # Modules
//!
//! - [`artifacts`] - Compiled artefact discovery and staging
//! - [`clean`] - Removal of staged and generated files
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Run configuration resolved from the command line
//! - [`deps`] - External command execution
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`dist`] - Distribution naming, manifest, and archive assembly
//! - [`error`] - Semantic error types
//! - [`output`] - Progress output
//! - [`pipeline`] - Describe, stage, and clean orchestration
//! - [`readme`] - Document reading with on-demand conversion
//! - [`tools`] - Download and installation of the document converter
//! - [`version`] - Version extraction from `CMakeLists.txt`

pub mod artifacts;
pub mod clean;
pub mod cli;
pub mod config;
pub mod deps;
pub mod dirs;
pub mod dist;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod readme;
pub mod tools;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
