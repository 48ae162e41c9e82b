//! Distribution naming, manifest schema, core metadata, and archive assembly.
//!
//! A finished distribution is a `.tar.zst` archive named
//! `<package>-<version>-<target>.tar.zst` with a `.sha256` file beside it.
//!
//! # Sub-modules
//!
//! - [`core_metadata`] - `PKG-INFO` rendering.
//! - [`manifest`] - Manifest schema (`DistManifest`).
//! - [`naming`] - Archive naming policy (`DistName`).
//! - [`packaging`] - Archive creation and manifest emission.
//! - [`packaging_error`] - Error types for packaging operations.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`target`] - Target triple validation (`TargetTriple`).
//! - [`timestamp`] - Generation timestamp (`GeneratedAt`).

pub mod core_metadata;
pub mod manifest;
pub mod naming;
pub mod packaging;
pub mod packaging_error;
pub mod sha256_digest;
pub mod target;
pub mod timestamp;
