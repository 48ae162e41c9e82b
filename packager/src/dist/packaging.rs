//! Distribution archive assembly.
//!
//! Writes the core metadata into the metadata directory, then creates a
//! `.tar.zst` archive in the build directory holding every file of the
//! package directory, `PKG-INFO` and a `manifest.json`. The finished archive
//! moves into the dist directory alongside a `.sha256` checksum file.

use super::core_metadata::{PKG_INFO_FILE_NAME, render_pkg_info};
use super::manifest::{DistManifest, MANIFEST_FILE_NAME, ManifestEntry};
use super::naming::DistName;
use super::packaging_error::PackagingError;
use super::sha256_digest::Sha256Digest;
use super::target::TargetTriple;
use super::timestamp::GeneratedAt;
use crate::config::ProjectPaths;
use crate::version::VersionTriple;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use open3d_dist::PackageMetadata;
use std::fs;
use walkdir::WalkDir;

/// Inputs for [`build_distribution`].
///
/// Groups the release identity and content so the function signature stays
/// small.
#[derive(Debug)]
pub struct DistributionRequest<'a> {
    /// Descriptive package metadata.
    pub metadata: &'a PackageMetadata,
    /// Release version.
    pub version: VersionTriple,
    /// reStructuredText long description.
    pub long_description: &'a str,
    /// Target triple the staged binaries were built for.
    pub target: TargetTriple,
    /// Timestamp recorded in the manifest.
    pub generated_at: GeneratedAt,
}

/// Output produced by [`build_distribution`].
#[derive(Debug)]
pub struct DistributionOutput {
    /// Path of the archive in the dist directory.
    pub archive_path: Utf8PathBuf,
    /// Path of the checksum file next to the archive.
    pub digest_path: Utf8PathBuf,
    /// SHA-256 digest of the archive.
    pub digest: Sha256Digest,
    /// Path of the core metadata file in the metadata directory.
    pub pkg_info_path: Utf8PathBuf,
    /// The manifest embedded in the archive.
    pub manifest: DistManifest,
}

/// A file to archive and the name it takes inside the archive.
#[derive(Debug, Clone)]
struct ArchiveEntry {
    source: Utf8PathBuf,
    archive_path: String,
}

/// Assembles the distribution archive for a staged package directory.
///
/// # Errors
///
/// Returns [`PackagingError::EmptyFileList`] if the package directory holds
/// no files, or [`PackagingError::Io`] / [`PackagingError::Serialization`]
/// on I/O or serialisation failures.
pub fn build_distribution(
    paths: &ProjectPaths,
    request: &DistributionRequest<'_>,
) -> Result<DistributionOutput, PackagingError> {
    let mut entries = collect_package_files(&paths.package_dir)?;
    if entries.is_empty() {
        return Err(PackagingError::EmptyFileList(paths.package_dir.clone()));
    }

    let pkg_info_path = write_pkg_info(&paths.metadata_dir, request)?;
    entries.push(ArchiveEntry {
        source: pkg_info_path.clone(),
        archive_path: PKG_INFO_FILE_NAME.to_owned(),
    });
    entries.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));

    let manifest = build_manifest(&entries, request)?;
    fs::create_dir_all(&paths.build_dir)?;
    let manifest_path = paths.build_dir.join(MANIFEST_FILE_NAME);
    fs::write(&manifest_path, manifest.to_json()?)?;
    entries.push(ArchiveEntry {
        source: manifest_path,
        archive_path: MANIFEST_FILE_NAME.to_owned(),
    });

    let name = DistName::new(&request.metadata.name, request.version, request.target.clone());
    let build_archive = paths.build_dir.join(name.filename());
    create_archive(&build_archive, &entries)?;

    fs::create_dir_all(&paths.dist_dir)?;
    let archive_path = paths.dist_dir.join(name.filename());
    fs::rename(&build_archive, &archive_path)?;
    debug!("wrote {archive_path}");

    let digest = Sha256Digest::of_file(archive_path.as_std_path())?;
    let digest_path = paths.dist_dir.join(name.digest_filename());
    fs::write(&digest_path, format!("{digest}  {}\n", name.filename()))?;

    Ok(DistributionOutput {
        archive_path,
        digest_path,
        digest,
        pkg_info_path,
        manifest,
    })
}

/// Lists every file under the package directory, prefixed with its name.
fn collect_package_files(package_dir: &Utf8Path) -> Result<Vec<ArchiveEntry>, PackagingError> {
    if !package_dir.is_dir() {
        return Ok(Vec::new());
    }
    let prefix = package_dir.file_name().unwrap_or("package");

    let mut entries = Vec::new();
    for entry in WalkDir::new(package_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(|path| {
            std::io::Error::other(format!("non-UTF-8 path {}", path.display()))
        })?;
        let Ok(relative) = source.strip_prefix(package_dir) else {
            continue;
        };
        let archive_path = std::iter::once(prefix)
            .chain(relative.iter())
            .collect::<Vec<_>>()
            .join("/");
        entries.push(ArchiveEntry {
            source,
            archive_path,
        });
    }
    Ok(entries)
}

fn write_pkg_info(
    metadata_dir: &Utf8Path,
    request: &DistributionRequest<'_>,
) -> Result<Utf8PathBuf, PackagingError> {
    fs::create_dir_all(metadata_dir)?;
    let path = metadata_dir.join(PKG_INFO_FILE_NAME);
    let contents = render_pkg_info(request.metadata, request.version, request.long_description);
    fs::write(&path, contents)?;
    Ok(path)
}

fn build_manifest(
    entries: &[ArchiveEntry],
    request: &DistributionRequest<'_>,
) -> Result<DistManifest, PackagingError> {
    let files = entries
        .iter()
        .map(|entry| {
            Ok(ManifestEntry {
                path: entry.archive_path.clone(),
                sha256: Sha256Digest::of_file(entry.source.as_std_path())?,
            })
        })
        .collect::<Result<Vec<_>, PackagingError>>()?;

    Ok(DistManifest {
        name: request.metadata.name.clone(),
        version: request.version.to_string(),
        target: request.target.clone(),
        generated_at: request.generated_at.clone(),
        files,
    })
}

/// Creates a `.tar.zst` archive at `output_path`.
fn create_archive(output_path: &Utf8Path, entries: &[ArchiveEntry]) -> Result<(), PackagingError> {
    let output_file = fs::File::create(output_path)?;
    let zstd_encoder = zstd::Encoder::new(output_file, 0)?.auto_finish();
    let mut archive = tar::Builder::new(zstd_encoder);

    for entry in entries {
        archive.append_path_with_name(&entry.source, &entry.archive_path)?;
    }

    archive.finish()?;
    Ok(())
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
