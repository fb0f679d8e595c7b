//! External command execution.
//!
//! Both the ping prober and the neighbor-table reader shell out to OS
//! utilities. Every invocation goes through [`CommandRunner`], which turns a
//! command plus timeout into either its stdout or a [`SkipReason`].

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::trace;

/// One external command to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub program: String,
    pub args: Vec<String>,
}

impl Attempt {
    /// Create a new attempt descriptor.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Why an attempt produced no usable output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("'{0}' is not installed")]
    NotInstalled(String),
    #[error("'{0}' could not be executed: permission denied")]
    NotPermitted(String),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("produced no output")]
    EmptyOutput,
    #[error("I/O error: {0}")]
    Io(String),
}

impl SkipReason {
    /// Whether the program itself is unavailable, as opposed to a run that
    /// started and went wrong.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::NotInstalled(_) | Self::NotPermitted(_))
    }
}

/// Runs an [`Attempt`] under a timeout.
///
/// Implementations must return `Ok` only for a zero exit status; the caller
/// decides whether empty output is acceptable.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, attempt: &Attempt, timeout: Duration) -> Result<String, SkipReason>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, attempt: &Attempt, timeout: Duration) -> Result<String, SkipReason> {
        let child = Command::new(&attempt.program)
            .args(&attempt.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&attempt.program, e))?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(SkipReason::Io(e.to_string())),
            Err(_) => return Err(SkipReason::TimedOut(timeout)),
        };

        trace!(command = %attempt, status = %output.status, "command finished");

        if !output.status.success() {
            return Err(SkipReason::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn spawn_error(program: &str, e: io::Error) -> SkipReason {
    match e.kind() {
        io::ErrorKind::NotFound => SkipReason::NotInstalled(program.to_string()),
        io::ErrorKind::PermissionDenied => SkipReason::NotPermitted(program.to_string()),
        _ => SkipReason::Io(e.to_string()),
    }
}
