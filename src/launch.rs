// src/launch.rs

//! Child process construction and termination handling.

use std::fmt;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use crate::errors::{Result, TagexecError};

/// Program name followed by its arguments. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(TagexecError::Usage);
        }
        Ok(Self { tokens })
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Bracketed display form, e.g. `[ls -lh]`.
    pub fn display(&self) -> String {
        format!("[{}]", self.tokens.join(" "))
    }

    /// All tokens joined with single spaces, as handed to the shell.
    pub fn shell_command(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// How the child is started. Fixed for the lifetime of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Exec `program` with `args` directly.
    #[default]
    Direct,
    /// Join all tokens and run them through the platform shell.
    ShellWrapped,
}

impl ExecutionMode {
    pub fn command(&self, invocation: &Invocation) -> Command {
        match self {
            ExecutionMode::Direct => {
                let mut c = Command::new(invocation.program());
                c.args(invocation.args());
                c
            }
            ExecutionMode::ShellWrapped => {
                if cfg!(windows) {
                    let mut c = Command::new("cmd");
                    c.arg("/C").arg(invocation.shell_command());
                    c
                } else {
                    let mut c = Command::new("sh");
                    c.arg("-c").arg(invocation.shell_command());
                    c
                }
            }
        }
    }
}

/// How the child terminated, as seen by `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failed(i32),
    Signaled(i32),
}

/// Classify a raw exit status.
pub fn classify(status: ExitStatus) -> ExitOutcome {
    match status.code() {
        Some(0) => ExitOutcome::Success,
        Some(code) => ExitOutcome::Failed(code),
        None => ExitOutcome::Signaled(signal_of(&status)),
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(-1)
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> i32 {
    -1
}

/// The child's two output pipes.
#[derive(Debug)]
pub struct ChildPipes {
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Handle used to await termination once both pipes are drained.
#[derive(Debug)]
pub struct Termination {
    child: Child,
    pid: u32,
}

impl Termination {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub async fn wait(mut self) -> std::io::Result<ExitOutcome> {
        let status = self.child.wait().await?;
        debug!(pid = self.pid, %status, "process reaped");
        Ok(classify(status))
    }
}

/// A started child with both pipes attached.
#[derive(Debug)]
pub struct ChildProcess {
    pipes: ChildPipes,
    termination: Termination,
}

impl ChildProcess {
    pub fn pid(&self) -> u32 {
        self.termination.pid
    }

    pub fn into_parts(self) -> (ChildPipes, Termination) {
        (self.pipes, self.termination)
    }
}

/// Start `invocation` according to `mode` with stdout and stderr piped.
pub fn launch(invocation: &Invocation, mode: ExecutionMode) -> Result<ChildProcess> {
    let mut cmd = mode.command(invocation);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Both pipes are created by `spawn` itself, before the program is
    // exec'd; failing to create them fails the spawn.
    let mut child = cmd.spawn().map_err(|source| TagexecError::Spawn {
        invocation: invocation.display(),
        source,
    })?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        // Only reachable if the `Stdio::piped()` calls above are removed.
        return Err(TagexecError::Spawn {
            invocation: invocation.display(),
            source: std::io::Error::other("stdout/stderr were not captured"),
        });
    };

    // `id()` is only `None` once the child has been reaped, which cannot have
    // happened yet.
    let pid = child.id().unwrap_or_default();

    debug!(invocation = %invocation, ?mode, pid, "process started");

    Ok(ChildProcess {
        pipes: ChildPipes { stdout, stderr },
        termination: Termination { child, pid },
    })
}
