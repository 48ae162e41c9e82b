//! Behaviour-driven tests for building the distribution.
//!
//! These scenarios run the whole pipeline over a temporary source tree. The
//! README converter is replaced by one that returns the Markdown verbatim.

use camino::{Utf8Path, Utf8PathBuf};
use open3d_dist::DistConfig;
use open3d_packager::config::{Mode, PackagerConfig, ProjectPaths, StageSettings};
use open3d_packager::dist::sha256_digest::Sha256Digest;
use open3d_packager::dist::target::TargetTriple;
use open3d_packager::dist::timestamp::GeneratedAt;
use open3d_packager::error::{PackagerError, Result as PackagerResult};
use open3d_packager::output::Progress;
use open3d_packager::pipeline::{RunSummary, run};
use open3d_packager::readme::{DocumentConverter, DocumentFormat};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use tempfile::TempDir;

/// Converter that returns documents unchanged.
struct VerbatimConverter;

impl DocumentConverter for VerbatimConverter {
    fn ensure_available(&self) -> PackagerResult<()> {
        Ok(())
    }

    fn convert(&self, path: &Utf8Path, _format: DocumentFormat) -> PackagerResult<String> {
        Ok(fs::read_to_string(path)?)
    }
}

struct DistributionWorld {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
    result: Option<PackagerResult<RunSummary>>,
}

#[fixture]
fn world() -> DistributionWorld {
    let temp_dir = TempDir::new().expect("temp dir");
    let root = Utf8Path::from_path(temp_dir.path())
        .expect("utf8 temp dir")
        .to_owned();
    DistributionWorld {
        _temp_dir: temp_dir,
        root,
        result: None,
    }
}

impl DistributionWorld {
    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }

    fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(self.root.join("python/package"), self.root.clone(), "open3d")
    }

    fn summary(&self) -> &RunSummary {
        match self.result.as_ref() {
            Some(Ok(summary)) => summary,
            Some(Err(err)) => panic!("expected the run to succeed: {err}"),
            None => panic!("the packager should have run"),
        }
    }

    fn archive_entries(&self) -> Vec<String> {
        let output = self
            .summary()
            .distribution
            .as_ref()
            .expect("a distribution was built");
        let file = fs::File::open(&output.archive_path).expect("open archive");
        let decoder = zstd::Decoder::new(file).expect("zstd decode");
        let mut archive = tar::Archive::new(decoder);
        archive
            .entries()
            .expect("entries")
            .map(|entry| {
                let entry = entry.expect("entry");
                entry.path().expect("path").to_string_lossy().into_owned()
            })
            .collect()
    }

    fn run_packager(&mut self, mode: Mode) {
        let config = PackagerConfig {
            mode,
            paths: self.paths(),
            release: DistConfig::default(),
        };
        let mut sink = Vec::new();
        let mut progress = Progress::new(&mut sink, false);
        self.result = Some(run(&config, &VerbatimConverter, &mut progress));
    }
}

#[given("an Open3D source tree at version {major}.{minor}.{patch}")]
fn given_source_tree(world: &mut DistributionWorld, major: String, minor: String, patch: String) {
    world.write(
        "CMakeLists.txt",
        &format!(
            "set(OPEN3D_VERSION_MAJOR \"{major}\")\n\
             set(OPEN3D_VERSION_MINOR \"{minor}\")\n\
             set(OPEN3D_VERSION_PATCH \"{patch}\")\n"
        ),
    );
    world.write("LICENSE", "The MIT License (MIT)\n");
    world.write("README.md", "Open3D\n======\n");
    world.write("python/package/open3d/__init__.py", "");
}

#[given("the build tree holds {relative}")]
fn given_build_file(world: &mut DistributionWorld, relative: String) {
    world.write(&format!("build/lib/{relative}"), "ELF");
}

#[when("the packager runs with staging")]
fn when_staging(world: &mut DistributionWorld) {
    let mode = Mode {
        stage: Some(StageSettings {
            base_dir: world.root.join("build/lib"),
            target: TargetTriple::try_from("x86_64-unknown-linux-gnu").expect("target"),
            generated_at: GeneratedAt::parse("2018-03-01T12:00:00Z").expect("timestamp"),
        }),
        clean: false,
    };
    world.run_packager(mode);
}

#[when("the packager runs without staging")]
fn when_describing(world: &mut DistributionWorld) {
    world.run_packager(Mode::default());
}

#[then("the archive {name} exists")]
fn then_archive_exists(world: &mut DistributionWorld, name: String) {
    let output = world
        .summary()
        .distribution
        .as_ref()
        .expect("a distribution was built");
    assert_eq!(output.archive_path, world.paths().dist_dir.join(name));
    assert!(output.archive_path.is_file());
}

#[then("the checksum file matches the archive")]
fn then_checksum_matches(world: &mut DistributionWorld) {
    let output = world
        .summary()
        .distribution
        .as_ref()
        .expect("a distribution was built");
    let digest = Sha256Digest::of_file(output.archive_path.as_std_path()).expect("digest");
    let sidecar = fs::read_to_string(&output.digest_path).expect("read checksum file");
    assert!(sidecar.starts_with(digest.as_str()));
}

#[then("the archive contains {entry}")]
fn then_archive_contains(world: &mut DistributionWorld, entry: String) {
    let entries = world.archive_entries();
    assert!(entries.contains(&entry), "entries: {entries:?}");
}

#[then("the reported version is {expected}")]
fn then_version(world: &mut DistributionWorld, expected: String) {
    assert_eq!(world.summary().description.version.to_string(), expected);
}

#[then("no distribution directory exists")]
fn then_no_dist(world: &mut DistributionWorld) {
    assert!(!world.paths().dist_dir.exists());
}

#[then("the run fails because no package data was found")]
fn then_empty(world: &mut DistributionWorld) {
    assert!(matches!(
        world.result,
        Some(Err(PackagerError::EmptyArtifactSet { .. }))
    ));
}

#[scenario(
    path = "tests/features/distribution.feature",
    name = "A staging run produces a checksummed archive"
)]
fn scenario_staging_run(world: DistributionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/distribution.feature",
    name = "A describe-only run writes nothing"
)]
fn scenario_describe_only(world: DistributionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/distribution.feature",
    name = "A staging run without compiled libraries fails"
)]
fn scenario_no_libraries(world: DistributionWorld) {
    let _ = world;
}
