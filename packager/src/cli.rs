//! CLI argument definitions for the Open3D packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Stage compiled Open3D binaries and assemble the redistributable bundle.
#[derive(Parser, Debug, Clone)]
#[command(name = "open3d-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Stage compiled Open3D binaries and assemble the redistributable bundle.\n\n",
    "Every run reads the release version from CMakeLists.txt and converts ",
    "README.md to reStructuredText. The bdist_wheel command additionally stages ",
    "the compiled libraries found under --base-dir, together with the licence ",
    "and README, into the package directory and builds the archive in dist/. ",
    "The clean command removes everything staging and building produced.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build the distribution from a CMake build tree:\n",
    "    $ open3d-packager --base-dir ../../build/lib bdist_wheel\n\n",
    "  Build, then remove the staged files:\n",
    "    $ open3d-packager --base-dir ../../build/lib bdist_wheel clean\n\n",
    "  Remove staged files left by an earlier run:\n",
    "    $ open3d-packager clean",
))]
pub struct Cli {
    /// Phases to run after the version and README are read.
    #[arg(value_enum, value_name = "COMMAND")]
    pub commands: Vec<PhaseCommand>,

    /// Directory searched recursively for compiled artefacts (required by
    /// bdist_wheel).
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<Utf8PathBuf>,

    /// Packaging project directory holding the package directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Source tree root [default: <PROJECT_DIR>/../..].
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<Utf8PathBuf>,

    /// Release configuration file [default: <PROJECT_DIR>/dist.toml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Target triple of the staged binaries [default: host].
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// Timestamp recorded in the manifest, as YYYY-MM-DDThh:mm:ssZ
    /// [default: now].
    #[arg(long, value_name = "TIMESTAMP")]
    pub generated_at: Option<String>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Optional phases selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCommand {
    /// Stage artefacts and build the distribution archive.
    #[value(name = "bdist_wheel", alias = "bdist-wheel")]
    BdistWheel,
    /// Remove staged and generated files.
    Clean,
}

impl Cli {
    /// Returns true when `command` appears among the requested phases.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use open3d_packager::cli::{Cli, PhaseCommand};
    ///
    /// let cli = Cli::parse_from(["open3d-packager", "clean"]);
    /// assert!(cli.requests(PhaseCommand::Clean));
    /// assert!(!cli.requests(PhaseCommand::BdistWheel));
    /// ```
    #[must_use]
    pub fn requests(&self, command: PhaseCommand) -> bool {
        self.commands.contains(&command)
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
