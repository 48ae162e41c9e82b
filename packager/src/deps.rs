//! External command execution.
//!
//! The packager shells out to the document converter. Commands run through
//! the [`CommandExecutor`] seam so tests can script their outcomes, and the
//! system implementation enforces a timeout so a hung tool cannot stall a
//! release build.

use crate::error::{PackagerError, Result};
use std::io::{self, Read};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for external commands (2 minutes).
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command, or [`PackagerError::CommandTimeout`] when it does not finish.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use open3d_packager::deps::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor::default();
    /// let output = executor.run("pandoc", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), open3d_packager::error::PackagerError>(())
    /// ```
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy)]
pub struct SystemCommandExecutor {
    timeout: Duration,
}

impl SystemCommandExecutor {
    /// Creates an executor that kills commands after `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemCommandExecutor {
    fn default() -> Self {
        Self::with_timeout(COMMAND_TIMEOUT)
    }
}

/// Reads a child pipe to the end on its own thread.
///
/// Both pipes are drained while the child runs, so a tool that writes more
/// than the OS pipe buffer cannot block on a full pipe.
fn drain<R>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(reader: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    reader
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))?
        .map_err(PackagerError::from)
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        match child.wait_timeout(self.timeout)? {
            Some(status) => Ok(Output {
                status,
                stdout: collect(stdout)?,
                stderr: collect(stderr)?,
            }),
            None => {
                let _ = child.kill();
                let _ = child.wait();
                // Grandchildren may still hold the pipes open, so the readers
                // are detached rather than joined.
                drop((stdout, stderr));
                Err(PackagerError::CommandTimeout {
                    command: cmd.to_owned(),
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Returns true if the given command executes successfully.
pub fn command_succeeds(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> bool {
    executor.run(cmd, args).is_ok_and(|o| o.status.success())
}

/// Returns the trimmed stderr of a failed command, falling back to the exit
/// status when the tool printed nothing.
#[must_use]
pub fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("exited with {}", output.status)
    } else {
        trimmed.to_owned()
    }
}
