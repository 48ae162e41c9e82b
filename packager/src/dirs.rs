//! Directory resolution abstraction for platform-specific paths.
//!
//! The packager caches downloaded tools under the per-user local data
//! directory. Resolution goes through [`BaseDirs`] so tests can point it at
//! a temporary directory.

use camino::Utf8PathBuf;
use directories_next::ProjectDirs;

/// Application name used for the per-user data directory.
const APP_NAME: &str = "open3d-dist";

/// Source of platform-specific base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory under which downloaded tools are installed.
    ///
    /// - Linux: `~/.local/share/open3d-dist`
    /// - macOS: `~/Library/Application Support/open3d-dist`
    /// - Windows: `%LOCALAPPDATA%\open3d-dist\data`
    fn data_local_dir(&self) -> Option<Utf8PathBuf>;

    /// Directory holding installed tool executables.
    fn tools_bin_dir(&self) -> Option<Utf8PathBuf> {
        self.data_local_dir().map(|dir| dir.join("bin"))
    }
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn data_local_dir(&self) -> Option<Utf8PathBuf> {
        ProjectDirs::from("org", "open3d", APP_NAME)
            .and_then(|dirs| Utf8PathBuf::try_from(dirs.data_local_dir().to_path_buf()).ok())
    }
}

/// [`BaseDirs`] rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct FixedBaseDirs {
    root: Utf8PathBuf,
}

impl FixedBaseDirs {
    /// Uses `root` as the local data directory.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BaseDirs for FixedBaseDirs {
    fn data_local_dir(&self) -> Option<Utf8PathBuf> {
        Some(self.root.clone())
    }
}
