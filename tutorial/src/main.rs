//! Open3D file I/O tutorial entrypoint.
//!
//! Summaries go to stdout; errors go to stderr with exit status 1.

use clap::Parser;
use open3d_tutorial::cli::Cli;
use open3d_tutorial::error::Result;
use open3d_tutorial::runner::{self, TutorialConfig};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let config = TutorialConfig::from(cli);
    let run_result = runner::run(&config, &mut std::io::stdout()).map(|_| ());
    let exit_code = exit_code_for_run_result(run_result, &mut std::io::stderr());
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            if writeln!(stderr, "error: {err}").is_err() {
                // Best-effort output; ignore write failures.
            }
            1
        }
    }
}
