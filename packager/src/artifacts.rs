//! Discovery and staging of compiled binary artefacts.
//!
//! A file is an artefact when its name matches `*<marker>*.<ext>` for one of
//! the configured extensions. Discovery walks the base directory recursively
//! in sorted order; staging copies every match flat into the package
//! directory.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::Pattern;
use log::{debug, warn};
use open3d_dist::DistConfig;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use walkdir::WalkDir;

/// File name filter for compiled artefacts.
#[derive(Debug, Clone)]
pub struct ArtifactMatcher {
    patterns: Vec<Pattern>,
}

impl ArtifactMatcher {
    /// Builds a matcher for `*<marker>*.<ext>` over each extension.
    ///
    /// The marker and extensions are matched literally and case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingFailed`] if a pattern cannot be
    /// compiled.
    pub fn new<S: AsRef<str>>(marker: &str, extensions: &[S]) -> Result<Self> {
        let marker = Pattern::escape(marker);
        let patterns = extensions
            .iter()
            .map(|ext| {
                let source = format!("*{marker}*.{}", Pattern::escape(ext.as_ref()));
                Pattern::new(&source).map_err(|e| PackagerError::StagingFailed {
                    reason: format!("invalid artefact pattern {source}: {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Builds the matcher described by the release configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingFailed`] if a pattern cannot be
    /// compiled.
    pub fn from_config(config: &DistConfig) -> Result<Self> {
        Self::new(config.name_marker(), &config.artifacts.extensions)
    }

    /// Returns true when `file_name` is an artefact name.
    ///
    /// # Examples
    ///
    /// ```
    /// use open3d_packager::artifacts::ArtifactMatcher;
    ///
    /// let matcher = ArtifactMatcher::new("open3d", &["so", "dll"])?;
    /// assert!(matcher.matches("libopen3d.so"));
    /// assert!(matcher.matches("open3d.dll"));
    /// assert!(!matcher.matches("foo.so"));
    /// # Ok::<(), open3d_packager::error::PackagerError>(())
    /// ```
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(file_name))
    }
}

/// Artefacts found under a base directory, in sorted walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    base_dir: Utf8PathBuf,
    paths: Vec<Utf8PathBuf>,
}

impl ArtifactSet {
    /// Paths of the discovered artefacts.
    #[must_use]
    pub fn paths(&self) -> &[Utf8PathBuf] {
        &self.paths
    }

    /// Number of discovered artefacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Distinct file names of the discovered artefacts.
    #[must_use]
    pub fn file_names(&self) -> BTreeSet<String> {
        self.paths
            .iter()
            .filter_map(|path| path.file_name())
            .map(str::to_owned)
            .collect()
    }

    /// Rejects an empty set.
    ///
    /// An empty set is a valid discovery result, but there is nothing to
    /// package.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::EmptyArtifactSet`] naming the base directory.
    pub fn require_non_empty(self) -> Result<Self> {
        if self.is_empty() {
            return Err(PackagerError::EmptyArtifactSet {
                base_dir: self.base_dir,
            });
        }
        Ok(self)
    }

    /// Maps each destination file name to its source, last match winning.
    fn by_destination_name(&self) -> BTreeMap<&str, &Utf8Path> {
        self.paths
            .iter()
            .filter_map(|path| path.file_name().map(|name| (name, path.as_path())))
            .collect()
    }
}

/// Recursively finds artefacts under `base_dir`.
///
/// A base directory that does not exist yields an empty set. Entries whose
/// paths are not valid UTF-8 are skipped with a warning.
///
/// # Errors
///
/// Returns [`PackagerError::Io`] if a directory cannot be read.
pub fn discover_artifacts(base_dir: &Utf8Path, matcher: &ArtifactMatcher) -> Result<ArtifactSet> {
    let mut paths = Vec::new();

    if !base_dir.is_dir() {
        debug!("artefact base directory {base_dir} does not exist");
        return Ok(ArtifactSet {
            base_dir: base_dir.to_owned(),
            paths,
        });
    }

    for entry in WalkDir::new(base_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            warn!("skipping non-UTF-8 file name under {base_dir}");
            continue;
        };
        if !matcher.matches(file_name) {
            continue;
        }
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => paths.push(path),
            Err(path) => warn!("skipping non-UTF-8 path {}", path.display()),
        }
    }

    debug!("discovered {} artefact(s) under {base_dir}", paths.len());
    Ok(ArtifactSet {
        base_dir: base_dir.to_owned(),
        paths,
    })
}

/// Discovers artefacts under `base_dir` and copies them into `package_dir`.
///
/// Artefacts are copied flat, so two matches with the same file name stage
/// to the same destination and the later one in walk order wins. A match
/// that already is its own destination is left in place, which keeps
/// repeated staging idempotent when the package directory sits under the
/// base directory.
///
/// Returns the staged destination paths, sorted.
///
/// # Errors
///
/// Returns [`PackagerError::EmptyArtifactSet`] when nothing matches, or
/// [`PackagerError::StagingFailed`] when a copy fails.
pub fn stage_artifacts(
    base_dir: &Utf8Path,
    package_dir: &Utf8Path,
    matcher: &ArtifactMatcher,
) -> Result<Vec<Utf8PathBuf>> {
    let artifacts = discover_artifacts(base_dir, matcher)?.require_non_empty()?;

    fs::create_dir_all(package_dir).map_err(|e| PackagerError::StagingFailed {
        reason: format!("failed to create {package_dir}: {e}"),
    })?;

    let mut staged = Vec::new();
    for (name, source) in artifacts.by_destination_name() {
        let dest = package_dir.join(name);
        if is_same_file(source, &dest) {
            debug!("{source} is already staged");
        } else {
            debug!("copying {source} -> {dest}");
            fs::copy(source, &dest).map_err(|e| PackagerError::StagingFailed {
                reason: format!("failed to copy {source} to {dest}: {e}"),
            })?;
        }
        staged.push(dest);
    }

    Ok(staged)
}

fn is_same_file(source: &Utf8Path, dest: &Utf8Path) -> bool {
    if source == dest {
        return true;
    }
    match (source.canonicalize_utf8(), dest.canonicalize_utf8()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Layout {
        _temp: TempDir,
        base: Utf8PathBuf,
        package: Utf8PathBuf,
    }

    #[fixture]
    fn layout() -> Layout {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf8 temp dir");
        let base = root.join("build").join("lib");
        let package = root.join("python").join("open3d");
        fs::create_dir_all(&base).expect("create base");
        Layout {
            _temp: temp,
            base,
            package,
        }
    }

    #[fixture]
    fn matcher() -> ArtifactMatcher {
        ArtifactMatcher::new("open3d", &["dll", "dylib", "pyd", "so"]).expect("matcher")
    }

    fn touch(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }

    #[rstest]
    #[case::lib_prefix("libopen3d.so", true)]
    #[case::windows("open3d.dll", true)]
    #[case::python_ext("open3d.cpython-36m.pyd", true)]
    #[case::macos("libopen3d_core.dylib", true)]
    #[case::unrelated("foo.so", false)]
    #[case::wrong_extension("libopen3d.a", false)]
    #[case::case_sensitive("libOpen3D.so", false)]
    #[case::versioned_suffix("libopen3d.so.0", false)]
    fn matcher_filters_names(
        matcher: ArtifactMatcher,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(matcher.matches(name), expected);
    }

    #[test]
    fn matcher_treats_marker_literally() {
        let matcher = ArtifactMatcher::new("o[p]en", &["so"]).expect("matcher");
        assert!(matcher.matches("libo[p]en.so"));
        assert!(!matcher.matches("libopen.so"));
    }

    #[rstest]
    fn discovery_keeps_only_matching_files(layout: Layout, matcher: ArtifactMatcher) {
        touch(&layout.base.join("libopen3d.so"), "a");
        touch(&layout.base.join("foo.so"), "b");
        touch(&layout.base.join("Release").join("open3d.dll"), "c");

        let set = discover_artifacts(&layout.base, &matcher).expect("discover");

        let names: Vec<_> = set.file_names().into_iter().collect();
        assert_eq!(names, ["libopen3d.so", "open3d.dll"]);
    }

    #[rstest]
    fn discovery_of_missing_dir_is_empty(layout: Layout, matcher: ArtifactMatcher) {
        let set = discover_artifacts(&layout.base.join("absent"), &matcher).expect("discover");
        assert!(set.is_empty());
    }

    #[rstest]
    fn empty_set_fails_the_policy(layout: Layout, matcher: ArtifactMatcher) {
        touch(&layout.base.join("foo.so"), "b");
        let set = discover_artifacts(&layout.base, &matcher).expect("discover");

        let err = set.require_non_empty().expect_err("empty set");

        assert!(matches!(
            err,
            PackagerError::EmptyArtifactSet { ref base_dir } if *base_dir == layout.base
        ));
    }

    #[rstest]
    fn staging_copies_matches_flat(layout: Layout, matcher: ArtifactMatcher) {
        touch(&layout.base.join("libopen3d.so"), "so");
        touch(&layout.base.join("Release").join("open3d.dll"), "dll");

        let staged = stage_artifacts(&layout.base, &layout.package, &matcher).expect("stage");

        assert_eq!(
            staged,
            [
                layout.package.join("libopen3d.so"),
                layout.package.join("open3d.dll"),
            ]
        );
        let dll = fs::read_to_string(layout.package.join("open3d.dll")).expect("read dll");
        assert_eq!(dll, "dll");
    }

    #[rstest]
    fn later_duplicate_names_win(layout: Layout, matcher: ArtifactMatcher) {
        touch(&layout.base.join("a").join("libopen3d.so"), "first");
        touch(&layout.base.join("b").join("libopen3d.so"), "second");

        let staged = stage_artifacts(&layout.base, &layout.package, &matcher).expect("stage");

        assert_eq!(staged.len(), 1);
        let contents = fs::read_to_string(layout.package.join("libopen3d.so")).expect("read");
        assert_eq!(contents, "second");
    }

    #[rstest]
    fn staging_twice_is_idempotent_when_package_is_nested(matcher: ArtifactMatcher) {
        let temp = tempfile::tempdir().expect("temp dir");
        let base = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf8");
        let package = base.join("open3d");
        touch(&base.join("lib").join("libopen3d.so"), "so");

        let first = stage_artifacts(&base, &package, &matcher).expect("first stage");
        let second = stage_artifacts(&base, &package, &matcher).expect("second stage");

        assert_eq!(first, second);
        let contents = fs::read_to_string(package.join("libopen3d.so")).expect("read");
        assert_eq!(contents, "so");
    }

    #[rstest]
    fn staging_nothing_reports_empty_set(layout: Layout, matcher: ArtifactMatcher) {
        let err = stage_artifacts(&layout.base, &layout.package, &matcher).expect_err("empty");
        assert!(matches!(err, PackagerError::EmptyArtifactSet { .. }));
        assert!(!layout.package.exists());
    }
}
