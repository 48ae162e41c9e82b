//! Unit tests for distribution archive assembly.

use super::*;
use rstest::{fixture, rstest};
use std::io::Read;
use tempfile::TempDir;

struct Project {
    _dir: TempDir,
    paths: ProjectPaths,
}

#[fixture]
fn project() -> Project {
    let dir = TempDir::new().expect("temp dir creation succeeds");
    let root = Utf8Path::from_path(dir.path()).expect("utf8 temp dir").to_owned();
    let paths = ProjectPaths::new(root.join("package"), root.clone(), "open3d");
    fs::create_dir_all(paths.package_dir.join("data")).expect("create package dir");
    fs::write(paths.package_dir.join("open3d.so"), b"ELF").expect("write binary");
    fs::write(paths.package_dir.join("LICENSE.txt"), b"MIT").expect("write licence");
    fs::write(paths.package_dir.join("data/colors.json"), b"{}").expect("write data");
    Project { _dir: dir, paths }
}

#[fixture]
fn metadata() -> PackageMetadata {
    PackageMetadata::default()
}

fn request(metadata: &PackageMetadata) -> DistributionRequest<'_> {
    DistributionRequest {
        metadata,
        version: VersionTriple::new(0, 2, 0),
        long_description: "Open3D\n======",
        target: TargetTriple::try_from("x86_64-unknown-linux-gnu").expect("valid target"),
        generated_at: GeneratedAt::parse("2018-03-01T12:00:00Z").expect("valid timestamp"),
    }
}

fn read_archive(archive_path: &Utf8Path) -> Vec<(String, Vec<u8>)> {
    let file = fs::File::open(archive_path).expect("open archive");
    let decoder = zstd::Decoder::new(file).expect("zstd decode");
    let mut archive = tar::Archive::new(decoder);
    archive
        .entries()
        .expect("entries")
        .map(|e| {
            let mut entry = e.expect("entry");
            let path = entry.path().expect("path").to_string_lossy().into_owned();
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("read entry");
            (path, contents)
        })
        .collect()
}

#[rstest]
fn archive_holds_package_files_metadata_and_manifest(project: Project, metadata: PackageMetadata) {
    let output = build_distribution(&project.paths, &request(&metadata)).expect("build");

    let names: Vec<String> = read_archive(&output.archive_path)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        [
            "PKG-INFO",
            "open3d/LICENSE.txt",
            "open3d/data/colors.json",
            "open3d/open3d.so",
            "manifest.json",
        ]
    );
}

#[rstest]
fn archive_is_named_after_the_release(project: Project, metadata: PackageMetadata) {
    let output = build_distribution(&project.paths, &request(&metadata)).expect("build");

    assert_eq!(
        output.archive_path,
        project
            .paths
            .dist_dir
            .join("open3d-0.2.0-x86_64-unknown-linux-gnu.tar.zst")
    );
    assert!(!project.paths.build_dir.join(output.archive_path.file_name().expect("name")).exists());
}

#[rstest]
fn checksum_file_matches_the_archive(project: Project, metadata: PackageMetadata) {
    let output = build_distribution(&project.paths, &request(&metadata)).expect("build");

    let expected = Sha256Digest::of_file(output.archive_path.as_std_path()).expect("digest");
    assert_eq!(output.digest, expected);
    let sidecar = fs::read_to_string(&output.digest_path).expect("read checksum");
    assert_eq!(
        sidecar,
        format!("{expected}  open3d-0.2.0-x86_64-unknown-linux-gnu.tar.zst\n")
    );
}

#[rstest]
fn manifest_lists_sorted_paths_with_digests(project: Project, metadata: PackageMetadata) {
    let output = build_distribution(&project.paths, &request(&metadata)).expect("build");

    let manifest = &output.manifest;
    assert_eq!(manifest.version, "0.2.0");
    assert_eq!(
        manifest.paths(),
        [
            "PKG-INFO",
            "open3d/LICENSE.txt",
            "open3d/data/colors.json",
            "open3d/open3d.so",
        ]
    );
    let binary = manifest
        .files
        .iter()
        .find(|entry| entry.path == "open3d/open3d.so")
        .expect("binary entry");
    assert_eq!(binary.sha256, Sha256Digest::of_bytes(b"ELF"));

    let archived = read_archive(&output.archive_path)
        .into_iter()
        .find(|(name, _)| name == MANIFEST_FILE_NAME)
        .expect("manifest entry");
    let parsed: serde_json::Value = serde_json::from_slice(&archived.1).expect("valid JSON");
    assert_eq!(parsed["generated_at"], "2018-03-01T12:00:00Z");
    assert_eq!(parsed["target"], "x86_64-unknown-linux-gnu");
}

#[rstest]
fn pkg_info_is_written_to_the_metadata_dir(project: Project, metadata: PackageMetadata) {
    let output = build_distribution(&project.paths, &request(&metadata)).expect("build");

    assert_eq!(
        output.pkg_info_path,
        project.paths.metadata_dir.join(PKG_INFO_FILE_NAME)
    );
    let pkg_info = fs::read_to_string(&output.pkg_info_path).expect("read PKG-INFO");
    assert!(pkg_info.starts_with("Metadata-Version: 2.1\nName: open3d\nVersion: 0.2.0\n"));
    assert!(pkg_info.ends_with("Open3D\n======\n"));
}

#[rstest]
fn empty_package_dir_is_rejected(metadata: PackageMetadata) {
    let dir = TempDir::new().expect("temp dir creation succeeds");
    let root = Utf8Path::from_path(dir.path()).expect("utf8 temp dir").to_owned();
    let paths = ProjectPaths::new(root.join("package"), root, "open3d");
    fs::create_dir_all(&paths.package_dir).expect("create package dir");

    let err = build_distribution(&paths, &request(&metadata)).expect_err("empty package");

    assert!(matches!(err, PackagingError::EmptyFileList(ref dir) if *dir == paths.package_dir));
    assert!(!paths.dist_dir.exists());
}
