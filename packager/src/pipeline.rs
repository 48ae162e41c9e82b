//! Packaging pipeline orchestration.
//!
//! A run always describes the release (README conversion and version
//! extraction). When requested it then stages the package directory and
//! builds the distribution, and finally cleans up:
//!
//! ```text
//! describe -> [stage -> distribute] -> [clean]
//! ```

use crate::artifacts::{ArtifactMatcher, stage_artifacts};
use crate::clean::clean;
use crate::config::{PackagerConfig, StageSettings};
use crate::dist::packaging::{DistributionOutput, DistributionRequest, build_distribution};
use crate::error::{PackagerError, Result};
use crate::output::Progress;
use crate::readme::{DocumentConverter, long_description, read_text_or_convert};
use crate::version::{VersionTriple, extract_version};
use camino::Utf8PathBuf;
use log::info;
use std::fs;

/// What the describe phase learns about the release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Release version from the build configuration.
    pub version: VersionTriple,
    /// README converted to reStructuredText.
    pub long_description: String,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// The release description.
    pub description: Description,
    /// Paths staged into the package directory.
    pub staged: Vec<Utf8PathBuf>,
    /// The built distribution, when one was requested.
    pub distribution: Option<DistributionOutput>,
    /// Paths removed by the clean phase.
    pub removed: Vec<Utf8PathBuf>,
}

/// Runs the phases selected by `config`.
///
/// # Errors
///
/// Returns the first error of any phase; later phases do not run.
pub fn run(
    config: &PackagerConfig,
    converter: &dyn DocumentConverter,
    progress: &mut Progress<'_>,
) -> Result<RunSummary> {
    let matcher = ArtifactMatcher::from_config(&config.release)?;

    let description = describe(config, converter)?;
    progress.line(format!(
        "{} {}",
        config.release.package.name, description.version
    ));

    let mut staged = Vec::new();
    let mut distribution = None;
    if let Some(settings) = &config.mode.stage {
        staged = stage(config, settings, &matcher, &description)?;
        progress.line(format!(
            "Staged {} file(s) into {}",
            staged.len(),
            config.paths.package_dir
        ));

        let output = distribute(config, settings, &description)?;
        progress.line(format!("Wrote {}", output.archive_path));
        distribution = Some(output);
    }

    let mut removed = Vec::new();
    if config.mode.clean {
        removed = clean(&config.paths, &matcher)?;
        for path in &removed {
            progress.line(format!("removing '{path}'"));
        }
    }

    Ok(RunSummary {
        description,
        staged,
        distribution,
        removed,
    })
}

/// Reads the long description and the release version.
///
/// # Errors
///
/// Returns conversion errors for the README, [`PackagerError::Io`] when the
/// build configuration cannot be read, or a version field error.
pub fn describe(config: &PackagerConfig, converter: &dyn DocumentConverter) -> Result<Description> {
    let paths = &config.paths;
    let long_description = long_description(converter, &paths.readme_source())?;
    let cmake = read_text_or_convert(converter, &paths.cmake_lists(), None)?;
    let version = extract_version(&cmake, &config.release.version_prefix())?;
    info!("describing {} {version}", config.release.package.name);

    Ok(Description {
        version,
        long_description,
    })
}

/// Copies the licence, writes the README, and stages the artefacts.
///
/// Returns every path written into the package directory.
fn stage(
    config: &PackagerConfig,
    settings: &StageSettings,
    matcher: &ArtifactMatcher,
    description: &Description,
) -> Result<Vec<Utf8PathBuf>> {
    let paths = &config.paths;
    info!("staging artefacts from {}", settings.base_dir);
    fs::create_dir_all(&paths.package_dir)?;

    let license = paths.staged_license();
    fs::copy(paths.license_source(), &license).map_err(|e| PackagerError::StagingFailed {
        reason: format!("failed to copy {} to {license}: {e}", paths.license_source()),
    })?;

    let readme = paths.staged_readme();
    fs::write(&readme, &description.long_description)?;

    let mut staged = vec![license, readme];
    staged.extend(stage_artifacts(&settings.base_dir, &paths.package_dir, matcher)?);
    Ok(staged)
}

fn distribute(
    config: &PackagerConfig,
    settings: &StageSettings,
    description: &Description,
) -> Result<DistributionOutput> {
    let request = DistributionRequest {
        metadata: &config.release.package,
        version: description.version,
        long_description: &description.long_description,
        target: settings.target.clone(),
        generated_at: settings.generated_at.clone(),
    };
    Ok(build_distribution(&config.paths, &request)?)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
