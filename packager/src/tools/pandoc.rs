//! Pandoc-backed document conversion.
//!
//! The pandoc executable is resolved in order from the `OPEN3D_DIST_PANDOC`
//! environment variable, a copy previously installed under the tools
//! directory, and finally `pandoc` on `PATH`. When none of them runs,
//! [`DocumentConverter::ensure_available`] downloads the pinned release into
//! the tools directory.

use super::download::ToolDownloader;
use super::extraction::{ArchiveKind, extract_executable};
use crate::deps::{CommandExecutor, command_succeeds, failure_reason};
use crate::dirs::BaseDirs;
use crate::error::{PackagerError, Result};
use crate::readme::{DocumentConverter, DocumentFormat};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs;

/// Pandoc release installed when no usable copy is found.
pub const PANDOC_VERSION: &str = "3.1.11";

/// Environment variable naming an explicit pandoc executable.
pub const PANDOC_ENV: &str = "OPEN3D_DIST_PANDOC";

const TOOL: &str = "pandoc";

/// Name of the pandoc executable on this platform.
#[must_use]
pub const fn executable_name() -> &'static str {
    if cfg!(windows) { "pandoc.exe" } else { "pandoc" }
}

/// A platform-specific pandoc release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PandocAsset {
    /// File name of the release asset.
    pub file_name: String,
    /// Container format of the asset.
    pub kind: ArchiveKind,
}

impl PandocAsset {
    /// Selects the release asset for an OS and CPU architecture, using the
    /// names reported by [`std::env::consts`].
    ///
    /// # Examples
    ///
    /// ```
    /// use open3d_packager::tools::pandoc::PandocAsset;
    ///
    /// let asset = PandocAsset::for_platform("linux", "x86_64").expect("supported");
    /// assert_eq!(asset.file_name, "pandoc-3.1.11-linux-amd64.tar.gz");
    /// assert!(PandocAsset::for_platform("freebsd", "x86_64").is_none());
    /// ```
    #[must_use]
    pub fn for_platform(os: &str, arch: &str) -> Option<Self> {
        let v = PANDOC_VERSION;
        let (file_name, kind) = match (os, arch) {
            ("linux", "x86_64") => (format!("pandoc-{v}-linux-amd64.tar.gz"), ArchiveKind::TarGz),
            ("linux", "aarch64") => (format!("pandoc-{v}-linux-arm64.tar.gz"), ArchiveKind::TarGz),
            ("macos", "x86_64") => (format!("pandoc-{v}-x86_64-macOS.zip"), ArchiveKind::Zip),
            ("macos", "aarch64") => (format!("pandoc-{v}-arm64-macOS.zip"), ArchiveKind::Zip),
            ("windows", "x86_64") => (format!("pandoc-{v}-windows-x86_64.zip"), ArchiveKind::Zip),
            _ => return None,
        };
        Some(Self { file_name, kind })
    }

    /// Selects the release asset for the running platform.
    #[must_use]
    pub fn host() -> Option<Self> {
        Self::for_platform(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Download URL of the asset.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "https://github.com/jgm/pandoc/releases/download/{PANDOC_VERSION}/{}",
            self.file_name
        )
    }
}

/// [`DocumentConverter`] that shells out to pandoc.
pub struct PandocConverter<'a> {
    executor: &'a dyn CommandExecutor,
    dirs: &'a dyn BaseDirs,
    downloader: &'a dyn ToolDownloader,
}

impl<'a> PandocConverter<'a> {
    /// Creates a converter running commands through `executor` and
    /// installing into the tools directory of `dirs`.
    #[must_use]
    pub fn new(
        executor: &'a dyn CommandExecutor,
        dirs: &'a dyn BaseDirs,
        downloader: &'a dyn ToolDownloader,
    ) -> Self {
        Self {
            executor,
            dirs,
            downloader,
        }
    }

    /// Resolves the pandoc executable to run.
    #[must_use]
    pub fn binary(&self) -> String {
        if let Some(explicit) = env_override() {
            return explicit;
        }
        if let Some(installed) = self.installed_path().filter(|path| path.is_file()) {
            return installed.into_string();
        }
        TOOL.to_owned()
    }

    fn installed_path(&self) -> Option<Utf8PathBuf> {
        self.dirs
            .tools_bin_dir()
            .map(|dir| dir.join(executable_name()))
    }

    fn install(&self) -> Result<Utf8PathBuf> {
        let bin_dir = self
            .dirs
            .tools_bin_dir()
            .ok_or_else(|| install_error("could not determine the tools directory"))?;
        let asset = PandocAsset::host().ok_or_else(|| {
            install_error(format!(
                "no pandoc {PANDOC_VERSION} release for {}-{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ))
        })?;

        fs::create_dir_all(&bin_dir)?;
        let archive = bin_dir.join(&asset.file_name);
        let url = asset.url();
        info!("downloading {url}");
        let fetched = self
            .downloader
            .download(&url, archive.as_std_path())
            .and_then(|()| {
                extract_executable(
                    archive.as_std_path(),
                    asset.kind,
                    executable_name(),
                    bin_dir.as_std_path(),
                )
            });
        // A failed download may still leave a partial archive behind.
        match fs::remove_file(&archive) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                debug!("could not remove {archive}: {e}");
            }
            _ => {}
        }
        fetched?;

        Ok(bin_dir.join(executable_name()))
    }
}

impl DocumentConverter for PandocConverter<'_> {
    fn ensure_available(&self) -> Result<()> {
        let binary = self.binary();
        if command_succeeds(self.executor, &binary, &["--version"]) {
            debug!("{binary} is available");
            return Ok(());
        }
        if env_override().is_some() {
            return Err(install_error(format!(
                "{PANDOC_ENV} points at {binary}, which does not run"
            )));
        }

        let installed = self.install()?;
        if command_succeeds(self.executor, installed.as_str(), &["--version"]) {
            info!("installed pandoc {PANDOC_VERSION} to {installed}");
            Ok(())
        } else {
            Err(install_error(format!("{installed} does not run after installation")))
        }
    }

    fn convert(&self, path: &Utf8Path, format: DocumentFormat) -> Result<String> {
        let binary = self.binary();
        debug!("converting {path} to {format} with {binary}");
        let output = self
            .executor
            .run(&binary, &["--to", format.as_str(), path.as_str()])?;
        if !output.status.success() {
            return Err(PackagerError::ConversionFailed {
                path: path.to_owned(),
                reason: failure_reason(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn env_override() -> Option<String> {
    std::env::var(PANDOC_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn install_error(message: impl Into<String>) -> PackagerError {
    PackagerError::DependencyInstall {
        tool: TOOL,
        message: message.into(),
    }
}
