//! Removal of staged and generated files.
//!
//! Every removal is guarded by an existence check, so cleaning an already
//! clean project does nothing and cleaning twice leaves the same state as
//! cleaning once.

use crate::artifacts::ArtifactMatcher;
use crate::config::ProjectPaths;
use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Removes staged artefacts, build outputs, metadata, and staged documents.
///
/// Staged artefacts are matched non-recursively in the package directory.
/// The build directory and metadata directory are removed recursively. The
/// package directory itself and the dist directory are kept.
///
/// Returns the removed paths in removal order.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Io`] if an existing path cannot be
/// removed.
pub fn clean(paths: &ProjectPaths, matcher: &ArtifactMatcher) -> Result<Vec<Utf8PathBuf>> {
    let mut removed = Vec::new();

    for artifact in staged_artifacts(&paths.package_dir, matcher)? {
        fs::remove_file(&artifact)?;
        removed.push(artifact);
    }

    for dir in [&paths.build_dir, &paths.metadata_dir] {
        if dir.is_dir() {
            fs::remove_dir_all(dir)?;
            removed.push(dir.clone());
        }
    }

    for file in [paths.staged_license(), paths.staged_readme()] {
        if file.exists() {
            fs::remove_file(&file)?;
            removed.push(file);
        }
    }

    debug!("clean removed {} path(s)", removed.len());
    Ok(removed)
}

/// Lists artefacts directly inside the package directory, sorted.
fn staged_artifacts(package_dir: &Utf8Path, matcher: &ArtifactMatcher) -> Result<Vec<Utf8PathBuf>> {
    if !package_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for entry in package_dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_file() && matcher.matches(entry.file_name()) {
            artifacts.push(entry.into_path());
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Project {
        _temp: TempDir,
        paths: ProjectPaths,
    }

    #[fixture]
    fn project() -> Project {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf8 temp dir");
        let paths = ProjectPaths::new(root.clone(), root.join("src"), "open3d");
        fs::create_dir_all(&paths.package_dir).expect("create package dir");
        fs::write(paths.package_dir.join("__init__.py"), "").expect("write init");
        Project { _temp: temp, paths }
    }

    #[fixture]
    fn matcher() -> ArtifactMatcher {
        ArtifactMatcher::new("open3d", &["dll", "dylib", "pyd", "so"]).expect("matcher")
    }

    fn populate(paths: &ProjectPaths) {
        fs::write(paths.package_dir.join("libopen3d.so"), "so").expect("write so");
        fs::write(paths.package_dir.join("open3d.pyd"), "pyd").expect("write pyd");
        fs::write(paths.staged_license(), "MIT").expect("write licence");
        fs::write(paths.staged_readme(), "Open3D").expect("write readme");
        fs::create_dir_all(paths.build_dir.join("lib")).expect("create build");
        fs::create_dir_all(&paths.metadata_dir).expect("create egg-info");
        fs::write(paths.metadata_dir.join("PKG-INFO"), "").expect("write pkg-info");
    }

    #[rstest]
    fn removes_everything_staging_produced(project: Project, matcher: ArtifactMatcher) {
        let paths = &project.paths;
        populate(paths);

        let removed = clean(paths, &matcher).expect("clean");

        assert_eq!(
            removed,
            [
                paths.package_dir.join("libopen3d.so"),
                paths.package_dir.join("open3d.pyd"),
                paths.build_dir.clone(),
                paths.metadata_dir.clone(),
                paths.staged_license(),
                paths.staged_readme(),
            ]
        );
        assert!(paths.package_dir.join("__init__.py").exists());
    }

    #[rstest]
    fn leaves_nested_artifacts_alone(project: Project, matcher: ArtifactMatcher) {
        let nested = project.paths.package_dir.join("sub").join("libopen3d.so");
        fs::create_dir_all(nested.parent().expect("parent")).expect("create sub");
        fs::write(&nested, "so").expect("write nested");

        clean(&project.paths, &matcher).expect("clean");

        assert!(nested.exists());
    }

    #[rstest]
    fn clean_project_is_a_no_op(project: Project, matcher: ArtifactMatcher) {
        let removed = clean(&project.paths, &matcher).expect("clean");
        assert!(removed.is_empty());
    }

    #[rstest]
    fn missing_package_dir_is_a_no_op(matcher: ArtifactMatcher) {
        let paths = ProjectPaths::new("/nonexistent/project".into(), "/nonexistent".into(), "open3d");
        let removed = clean(&paths, &matcher).expect("clean");
        assert!(removed.is_empty());
    }

    #[rstest]
    fn cleaning_twice_matches_cleaning_once(project: Project, matcher: ArtifactMatcher) {
        populate(&project.paths);

        let first = clean(&project.paths, &matcher).expect("first clean");
        let second = clean(&project.paths, &matcher).expect("second clean");

        assert!(!first.is_empty());
        assert!(second.is_empty());
    }
}
