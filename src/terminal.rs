// src/terminal.rs

//! Per-stream terminal capability detection.
//!
//! Stdout and stderr are judged independently: stdout may be redirected to a
//! file while stderr still goes to a terminal (and the other way round). A
//! single process-wide switch would get one of those cases wrong.

use std::io::{self, IsTerminal};

/// Whether each of our own output streams should carry ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalCaps {
    pub stdout: bool,
    pub stderr: bool,
}

/// The environment variables that bear on coloring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorEnv {
    pub term: Option<String>,
    pub no_color: Option<String>,
}

impl ColorEnv {
    pub fn from_process() -> Self {
        Self {
            term: std::env::var("TERM").ok(),
            no_color: std::env::var("NO_COLOR").ok(),
        }
    }

    /// `TERM=dumb` or a non-empty `NO_COLOR` turns colors off on both streams.
    pub fn colors_disabled(&self) -> bool {
        self.term.as_deref() == Some("dumb")
            || self.no_color.as_deref().is_some_and(|v| !v.is_empty())
    }
}

impl TerminalCaps {
    /// Inspect the real stdout/stderr descriptors and the environment.
    pub fn detect() -> Self {
        Self::from_env(
            &ColorEnv::from_process(),
            io::stdout().is_terminal(),
            io::stderr().is_terminal(),
        )
    }

    pub fn from_env(env: &ColorEnv, stdout_is_terminal: bool, stderr_is_terminal: bool) -> Self {
        Self {
            stdout: should_colorize(env, stdout_is_terminal),
            stderr: should_colorize(env, stderr_is_terminal),
        }
    }

    /// Plain output on both streams.
    pub fn plain() -> Self {
        Self::default()
    }
}

/// Colorization policy for one stream.
///
/// `is_terminal` comes from `IsTerminal`, which also reports MSYS/Cygwin
/// ptys as terminals on Windows.
pub fn should_colorize(env: &ColorEnv, is_terminal: bool) -> bool {
    !env.colors_disabled() && is_terminal
}
