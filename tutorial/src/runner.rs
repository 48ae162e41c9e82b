//! Reads each sample asset, prints its summary and writes a copy.

use crate::error::Result;
use crate::image::{read_image, write_image};
use crate::mesh::{read_triangle_mesh, read_triangle_mesh_with_encoding, write_triangle_mesh};
use crate::ply;
use crate::point_cloud::{read_point_cloud, read_point_cloud_with_encoding, write_point_cloud};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use std::fmt::Display;
use std::fs;
use std::io::Write;

/// Data directory used when none is given, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "../../../test/TestData";
/// Point cloud read by default.
pub const DEFAULT_POINT_CLOUD: &str = "fragment.pcd";
/// Mesh read by default.
pub const DEFAULT_MESH: &str = "knot.ply";
/// Image read by default.
pub const DEFAULT_IMAGE: &str = "lena_color.jpg";

/// Prefix given to every written copy.
const COPY_PREFIX: &str = "copy_of_";

/// Where the sample assets live and where their copies go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialConfig {
    /// Directory holding the sample assets.
    pub data_dir: Utf8PathBuf,
    /// Directory receiving the copies; created when absent.
    pub output_dir: Utf8PathBuf,
    /// Point cloud file name inside `data_dir`.
    pub point_cloud: String,
    /// Mesh file name inside `data_dir`.
    pub mesh: String,
    /// Image file name inside `data_dir`.
    pub image: String,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            data_dir: Utf8PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: Utf8PathBuf::from("."),
            point_cloud: DEFAULT_POINT_CLOUD.to_owned(),
            mesh: DEFAULT_MESH.to_owned(),
            image: DEFAULT_IMAGE.to_owned(),
        }
    }
}

impl TutorialConfig {
    /// Path of a sample asset.
    #[must_use]
    pub fn input(&self, name: &str) -> Utf8PathBuf {
        self.data_dir.join(name)
    }

    /// Path of the copy written for a sample asset.
    #[must_use]
    pub fn output(&self, name: &str) -> Utf8PathBuf {
        let file_name = Utf8Path::new(name).file_name().unwrap_or(name);
        self.output_dir.join(format!("{COPY_PREFIX}{file_name}"))
    }
}

/// Counts observed on the copies after they were read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialReport {
    /// Points in the copied point cloud.
    pub points: usize,
    /// Vertices in the copied mesh.
    pub mesh_vertices: usize,
    /// Triangles in the copied mesh.
    pub triangles: usize,
    /// Width and height of the copied image.
    pub image_size: (u32, u32),
    /// Channels of the copied image.
    pub image_channels: u8,
}

/// Writes a line of tutorial output, ignoring closed pipes.
fn write_line(out: &mut dyn Write, line: impl Display) {
    if writeln!(out, "{line}").is_err() {
        // Nothing useful can be done when stdout is gone.
    }
}

/// Runs the point cloud, mesh and image round trips in that order.
///
/// Each asset is read from the data directory, summarised on `out`,
/// written to the output directory and read back.
///
/// # Errors
///
/// Returns the first [`crate::error::GeometryError`] raised. Later assets
/// are not attempted.
pub fn run(config: &TutorialConfig, out: &mut dyn Write) -> Result<TutorialReport> {
    fs::create_dir_all(&config.output_dir).map_err(ply::io_error(&config.output_dir))?;

    write_line(out, "Testing IO for point cloud ...");
    let (cloud, encoding) = read_point_cloud_with_encoding(&config.input(&config.point_cloud))?;
    write_line(out, &cloud);
    let cloud_copy = config.output(&config.point_cloud);
    write_point_cloud(&cloud_copy, &cloud, encoding)?;
    let points = read_point_cloud(&cloud_copy)?.len();
    info!("wrote {cloud_copy}");

    write_line(out, "Testing IO for meshes ...");
    let (mesh, encoding) = read_triangle_mesh_with_encoding(&config.input(&config.mesh))?;
    write_line(out, &mesh);
    let mesh_copy = config.output(&config.mesh);
    write_triangle_mesh(&mesh_copy, &mesh, encoding)?;
    let mesh_back = read_triangle_mesh(&mesh_copy)?;
    info!("wrote {mesh_copy}");

    write_line(out, "Testing IO for images ...");
    let image = read_image(&config.input(&config.image))?;
    write_line(out, &image);
    let image_copy = config.output(&config.image);
    write_image(&image_copy, &image)?;
    let image_back = read_image(&image_copy)?;
    info!("wrote {image_copy}");

    Ok(TutorialReport {
        points,
        mesh_vertices: mesh_back.vertices.len(),
        triangles: mesh_back.triangles.len(),
        image_size: (image_back.width(), image_back.height()),
        image_channels: image_back.channels(),
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
