//! User-facing progress output.
//!
//! Progress goes to stderr so that stdout stays free for tooling; `--quiet`
//! silences it. Diagnostics go through `log` instead.

use std::fmt::Display;
use std::io::Write;

/// Writes a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Progress reporter that can be silenced.
pub struct Progress<'a> {
    out: &'a mut dyn Write,
    quiet: bool,
}

impl<'a> Progress<'a> {
    /// Reports to `out` unless `quiet` is set.
    #[must_use]
    pub fn new(out: &'a mut dyn Write, quiet: bool) -> Self {
        Self { out, quiet }
    }

    /// Writes one progress line.
    pub fn line(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(self.out, message);
        }
    }
}
