//! Run configuration resolved from the command line.
//!
//! Parsing produces a [`Cli`]; this module turns it into an explicit
//! [`PackagerConfig`] before any file is touched, so the pipeline never
//! inspects raw arguments.

use crate::cli::{Cli, PhaseCommand};
use crate::dist::target::TargetTriple;
use crate::dist::timestamp::GeneratedAt;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use open3d_dist::{DEFAULT_CONFIG_FILE, DistConfig};

/// Default location of the source tree relative to the project directory.
const DEFAULT_SOURCE_ROOT: &str = "../..";

/// Files and directories the packager reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory holding the package directory and build outputs.
    pub project_dir: Utf8PathBuf,
    /// Root of the source tree (`CMakeLists.txt`, `LICENSE`, `README.md`).
    pub source_root: Utf8PathBuf,
    /// Package directory artefacts are staged into: `<project>/<name>`.
    pub package_dir: Utf8PathBuf,
    /// Intermediate build output directory: `<project>/build`.
    pub build_dir: Utf8PathBuf,
    /// Core metadata directory: `<project>/<name>.egg-info`.
    pub metadata_dir: Utf8PathBuf,
    /// Finished distribution directory: `<project>/dist`.
    pub dist_dir: Utf8PathBuf,
}

impl ProjectPaths {
    /// Lays out the project for a package called `package_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use open3d_packager::config::ProjectPaths;
    ///
    /// let paths = ProjectPaths::new("pkg".into(), "src".into(), "open3d");
    /// assert!(paths.package_dir.ends_with("open3d"));
    /// assert!(paths.metadata_dir.ends_with("open3d.egg-info"));
    /// assert!(paths.cmake_lists().starts_with("src"));
    /// ```
    #[must_use]
    pub fn new(project_dir: Utf8PathBuf, source_root: Utf8PathBuf, package_name: &str) -> Self {
        Self {
            package_dir: project_dir.join(package_name),
            build_dir: project_dir.join("build"),
            metadata_dir: project_dir.join(format!("{package_name}.egg-info")),
            dist_dir: project_dir.join("dist"),
            project_dir,
            source_root,
        }
    }

    /// The build configuration holding the version labels.
    #[must_use]
    pub fn cmake_lists(&self) -> Utf8PathBuf {
        self.source_root.join("CMakeLists.txt")
    }

    /// The licence shipped with the sources.
    #[must_use]
    pub fn license_source(&self) -> Utf8PathBuf {
        self.source_root.join("LICENSE")
    }

    /// The Markdown README shipped with the sources.
    #[must_use]
    pub fn readme_source(&self) -> Utf8PathBuf {
        self.source_root.join("README.md")
    }

    /// Where the licence is staged.
    #[must_use]
    pub fn staged_license(&self) -> Utf8PathBuf {
        self.package_dir.join("LICENSE.txt")
    }

    /// Where the converted README is staged.
    #[must_use]
    pub fn staged_readme(&self) -> Utf8PathBuf {
        self.package_dir.join("README.rst")
    }
}

/// Settings that only matter when a distribution is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSettings {
    /// Directory searched for compiled artefacts.
    pub base_dir: Utf8PathBuf,
    /// Target triple recorded in the archive name and manifest.
    pub target: TargetTriple,
    /// Timestamp recorded in the manifest.
    pub generated_at: GeneratedAt,
}

/// Which optional phases run around the mandatory describe phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mode {
    /// Stage artefacts and build the distribution.
    pub stage: Option<StageSettings>,
    /// Remove staged and generated files afterwards.
    pub clean: bool,
}

/// Explicit configuration consumed by [`crate::pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerConfig {
    /// Phases to run.
    pub mode: Mode,
    /// Project layout.
    pub paths: ProjectPaths,
    /// Release configuration loaded from `dist.toml`.
    pub release: DistConfig,
}

impl PackagerConfig {
    /// Resolves parsed arguments into a run configuration.
    ///
    /// Loads the release configuration, lays out the project and, when
    /// `bdist_wheel` was requested, validates the staging settings.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingBaseDir`] when staging is requested
    /// without `--base-dir`, [`PackagerError::Config`] when `dist.toml` is
    /// malformed, or [`PackagerError::Packaging`] for an unsupported target
    /// or malformed timestamp.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_dir = cli.project_dir.clone();
        let source_root = cli
            .source_root
            .clone()
            .unwrap_or_else(|| project_dir.join(DEFAULT_SOURCE_ROOT));
        let config_file = cli
            .config
            .clone()
            .unwrap_or_else(|| project_dir.join(DEFAULT_CONFIG_FILE));

        let release = DistConfig::load_from(&config_file)?;
        let paths = ProjectPaths::new(project_dir, source_root, &release.package.name);

        let stage = if cli.requests(PhaseCommand::BdistWheel) {
            Some(resolve_stage_settings(cli)?)
        } else {
            if cli.base_dir.is_some() {
                debug!("ignoring --base-dir because bdist_wheel was not requested");
            }
            None
        };

        Ok(Self {
            mode: Mode {
                stage,
                clean: cli.requests(PhaseCommand::Clean),
            },
            paths,
            release,
        })
    }

    /// The artefact search root, when staging.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Utf8Path> {
        self.mode
            .stage
            .as_ref()
            .map(|settings| settings.base_dir.as_path())
    }
}

fn resolve_stage_settings(cli: &Cli) -> Result<StageSettings> {
    let base_dir = cli.base_dir.clone().ok_or(PackagerError::MissingBaseDir)?;
    let target = match &cli.target {
        Some(triple) => TargetTriple::try_from(triple.as_str())?,
        None => TargetTriple::host()?,
    };
    let generated_at = match &cli.generated_at {
        Some(value) => GeneratedAt::parse(value)?,
        None => GeneratedAt::now(),
    };

    Ok(StageSettings {
        base_dir,
        target,
        generated_at,
    })
}
