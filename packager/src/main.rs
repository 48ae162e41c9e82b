//! Open3D packager CLI entrypoint.
//!
//! This binary reads the release version and README of an Open3D source
//! tree and, on request, stages the compiled libraries and builds the
//! redistributable archive. Progress and errors go to stderr.

use clap::Parser;
use open3d_packager::cli::Cli;
use open3d_packager::config::PackagerConfig;
use open3d_packager::deps::SystemCommandExecutor;
use open3d_packager::dirs::SystemBaseDirs;
use open3d_packager::error::Result;
use open3d_packager::output::{Progress, write_stderr_line};
use open3d_packager::pipeline;
use open3d_packager::tools::download::HttpDownloader;
use open3d_packager::tools::pandoc::PandocConverter;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs the logger; `RUST_LOG` overrides the verbosity flags.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = PackagerConfig::from_cli(cli)?;

    let executor = SystemCommandExecutor::default();
    let dirs = SystemBaseDirs;
    let downloader = HttpDownloader;
    let converter = PandocConverter::new(&executor, &dirs, &downloader);

    let mut progress = Progress::new(stderr, cli.quiet);
    pipeline::run(&config, &converter, &mut progress)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
