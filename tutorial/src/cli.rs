//! CLI argument definitions for the file I/O tutorial.

use crate::runner::{
    DEFAULT_DATA_DIR, DEFAULT_IMAGE, DEFAULT_MESH, DEFAULT_POINT_CLOUD, TutorialConfig,
};
use camino::Utf8PathBuf;
use clap::Parser;

/// Read, summarise and copy the Open3D sample point cloud, mesh and image.
#[derive(Parser, Debug, Clone)]
#[command(name = "open3d-tutorial")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Run against the test data of a source checkout:\n",
    "    $ open3d-tutorial --data-dir ~/Open3D/src/test/TestData\n\n",
    "  Write the copies somewhere else:\n",
    "    $ open3d-tutorial --output-dir /tmp/open3d-copies",
))]
pub struct Cli {
    /// Directory holding the sample assets.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: Utf8PathBuf,

    /// Directory receiving the copies.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: Utf8PathBuf,

    /// Point cloud file inside the data directory.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_POINT_CLOUD)]
    pub point_cloud: String,

    /// Mesh file inside the data directory.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MESH)]
    pub mesh: String,

    /// Image file inside the data directory.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

impl From<Cli> for TutorialConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir,
            output_dir: cli.output_dir,
            point_cloud: cli.point_cloud,
            mesh: cli.mesh,
            image: cli.image,
        }
    }
}
