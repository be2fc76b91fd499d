// src/label.rs

//! Label rendering for tagged output lines.
//!
//! A label is `<program> <pid>`, where `<program>` is the invocation in its
//! bracketed form (`[ls -lh]`). With colors on, the program is yellow and the
//! pid red.
//!
//! Each [`LabelRenderer`] carries its own colorize flag. `colored` would
//! otherwise consult a process-wide switch derived from stdout alone, so that
//! switch is pinned on once and the per-renderer flag is the only thing that
//! decides.

use std::fmt;
use std::sync::Once;

use colored::Colorize;

use crate::launch::Invocation;

static PIN_COLOR_OVERRIDE: Once = Once::new();

/// Rendered, immutable label text (may contain ANSI escapes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders labels for one output stream.
#[derive(Debug, Clone, Copy)]
pub struct LabelRenderer {
    colorize: bool,
}

impl LabelRenderer {
    pub fn new(colorize: bool) -> Self {
        PIN_COLOR_OVERRIDE.call_once(|| colored::control::set_override(true));
        Self { colorize }
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    /// Program part only, used before the pid is known.
    pub fn render_program(&self, invocation: &Invocation) -> String {
        let text = invocation.display();
        if self.colorize {
            text.yellow().to_string()
        } else {
            text
        }
    }

    pub fn render_pid(&self, pid: u32) -> String {
        let text = pid.to_string();
        if self.colorize {
            text.red().to_string()
        } else {
            text
        }
    }

    pub fn render(&self, invocation: &Invocation, pid: u32) -> Label {
        Label(format!(
            "{} {}",
            self.render_program(invocation),
            self.render_pid(pid)
        ))
    }
}

/// The labels used once the child is running.
///
/// `plain` never carries escapes. It goes into log events and error
/// messages, where the subscriber does its own coloring and escapes any
/// control characters found in the message.
#[derive(Debug, Clone)]
pub struct Labels {
    pub stdout: Label,
    pub stderr: Label,
    pub plain: Label,
}

impl Labels {
    pub fn new(
        stdout: &LabelRenderer,
        stderr: &LabelRenderer,
        invocation: &Invocation,
        pid: u32,
    ) -> Self {
        Self {
            stdout: stdout.render(invocation, pid),
            stderr: stderr.render(invocation, pid),
            plain: LabelRenderer::new(false).render(invocation, pid),
        }
    }
}
