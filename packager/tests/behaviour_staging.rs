//! Behaviour-driven tests for artefact staging.
//!
//! These scenarios populate a temporary build tree and stage it into a
//! package directory with the default Open3D artefact filter.

use camino::{Utf8Path, Utf8PathBuf};
use open3d_dist::DistConfig;
use open3d_packager::artifacts::{ArtifactMatcher, stage_artifacts};
use open3d_packager::error::{PackagerError, Result as PackagerResult};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use tempfile::TempDir;

struct StagingWorld {
    _temp_dir: TempDir,
    base_dir: Utf8PathBuf,
    package_dir: Utf8PathBuf,
    result: Option<PackagerResult<Vec<Utf8PathBuf>>>,
}

#[fixture]
fn world() -> StagingWorld {
    let temp_dir = TempDir::new().expect("temp dir");
    let root = Utf8Path::from_path(temp_dir.path())
        .expect("utf8 temp dir")
        .to_owned();
    StagingWorld {
        _temp_dir: temp_dir,
        base_dir: root.join("build/lib"),
        package_dir: root.join("python/package/open3d"),
        result: None,
    }
}

fn write_build_file(world: &StagingWorld, relative: &str, contents: &str) {
    let path = world.base_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create build dir");
    }
    fs::write(path, contents).expect("write build file");
}

#[given("a build file {relative} holding {contents}")]
fn given_build_file_with_contents(world: &mut StagingWorld, relative: String, contents: String) {
    write_build_file(world, &relative, &contents);
}

#[given("a build tree containing {relative}")]
fn given_build_file(world: &mut StagingWorld, relative: String) {
    write_build_file(world, &relative, "binary");
}

#[when("the artefacts are staged")]
fn when_staged(world: &mut StagingWorld) {
    let matcher = ArtifactMatcher::from_config(&DistConfig::default()).expect("matcher");
    world.result = Some(stage_artifacts(&world.base_dir, &world.package_dir, &matcher));
}

#[then("the package directory holds {name}")]
fn then_holds(world: &mut StagingWorld, name: String) {
    match world.result.as_ref() {
        Some(Ok(staged)) => assert!(staged.contains(&world.package_dir.join(&name))),
        other => panic!("expected staging to succeed, got {other:?}"),
    }
    assert!(world.package_dir.join(name).is_file());
}

#[then("the package directory does not hold {name}")]
fn then_does_not_hold(world: &mut StagingWorld, name: String) {
    assert!(!world.package_dir.join(name).exists());
}

#[then("the staged {name} contains {contents}")]
fn then_contents(world: &mut StagingWorld, name: String, contents: String) {
    let staged = fs::read_to_string(world.package_dir.join(name)).expect("read staged file");
    assert_eq!(staged, contents);
}

#[then("staging fails because no package data was found")]
fn then_empty(world: &mut StagingWorld) {
    match world.result.as_ref() {
        Some(Err(PackagerError::EmptyArtifactSet { base_dir })) => {
            assert_eq!(*base_dir, world.base_dir);
        }
        other => panic!("expected an empty artefact set error, got {other:?}"),
    }
    assert!(!world.package_dir.exists());
}

#[scenario(
    path = "tests/features/staging.feature",
    name = "Matching libraries are staged from nested directories"
)]
fn scenario_stage_nested(world: StagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/staging.feature",
    name = "The later of two same-named libraries wins"
)]
fn scenario_later_wins(world: StagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/staging.feature",
    name = "An empty build tree is rejected"
)]
fn scenario_empty_tree(world: StagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/staging.feature",
    name = "Staging twice gives the same result"
)]
fn scenario_stage_twice(world: StagingWorld) {
    let _ = world;
}
