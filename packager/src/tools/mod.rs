//! External tools the packager installs on demand.
//!
//! - [`download`]: release asset download trait and HTTP implementation.
//! - [`extraction`]: pulls a single executable out of a release archive.
//! - [`pandoc`]: the pandoc-backed document converter.

pub mod download;
pub mod extraction;
pub mod pandoc;
