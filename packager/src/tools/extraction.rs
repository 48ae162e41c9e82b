//! Extraction of a single executable from a tool release archive.
//!
//! Release archives nest the executable under a versioned directory, so the
//! entry is located by file name and written flat into the destination.
//! Nothing else in the archive is unpacked.

use super::download::DownloadError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Container format of a release archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Gzip-compressed tarball.
    TarGz,
    /// Zip archive.
    Zip,
}

/// Copies the entry named `executable` out of `archive` into `dest_dir`.
///
/// Returns the path of the extracted executable, which is marked executable
/// on Unix.
///
/// # Errors
///
/// Returns [`DownloadError::Extraction`] when the archive is malformed or
/// holds no such entry, or [`DownloadError::Io`] on write failures.
pub fn extract_executable(
    archive: &Path,
    kind: ArchiveKind,
    executable: &str,
    dest_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dest_dir)?;
    let dest = dest_dir.join(executable);

    let found = match kind {
        ArchiveKind::TarGz => extract_from_tar_gz(archive, executable, &dest),
        ArchiveKind::Zip => extract_from_zip(archive, executable, &dest),
    }
    .map_err(|e| extraction_error(archive, e.to_string()))?;

    if !found {
        return Err(extraction_error(
            archive,
            format!("no {executable} entry in archive"),
        ));
    }

    mark_executable(&dest)?;
    Ok(dest)
}

fn extract_from_tar_gz(archive: &Path, executable: &str, dest: &Path) -> io::Result<bool> {
    let file = fs::File::open(archive)?;
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));

    for entry in tar.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let matches = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == executable);
        if matches {
            let mut out = fs::File::create(dest)?;
            io::copy(&mut entry, &mut out)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn extract_from_zip(archive: &Path, executable: &str, dest: &Path) -> io::Result<bool> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(io::Error::other)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(io::Error::other)?;
        if entry.is_dir() {
            continue;
        }
        let matches = entry
            .enclosed_name()
            .is_some_and(|path| path.file_name().is_some_and(|name| name == executable));
        if matches {
            let mut out = fs::File::create(dest)?;
            io::copy(&mut entry, &mut out)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn extraction_error(archive: &Path, reason: String) -> DownloadError {
    DownloadError::Extraction {
        archive: archive.file_name().map_or_else(
            || archive.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        ),
        reason,
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
