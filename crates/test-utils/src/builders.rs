#![allow(dead_code)]

use tagexec::launch::{ExecutionMode, Invocation};
use tagexec::multiplex::Sinks;

use crate::buffer::SharedBuffer;

/// Builder for an [`Invocation`] plus the mode it should run in.
pub struct InvocationBuilder {
    tokens: Vec<String>,
    mode: ExecutionMode,
}

impl InvocationBuilder {
    /// Run `program` directly.
    pub fn direct(program: &str) -> Self {
        Self {
            tokens: vec![program.to_string()],
            mode: ExecutionMode::Direct,
        }
    }

    /// Run `script` through the shell as a single token.
    pub fn shell(script: &str) -> Self {
        Self {
            tokens: vec![script.to_string()],
            mode: ExecutionMode::ShellWrapped,
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.tokens.push(arg.to_string());
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> (Invocation, ExecutionMode) {
        let invocation =
            Invocation::new(self.tokens).expect("builder always has at least one token");
        (invocation, self.mode)
    }
}

/// A pair of in-memory sinks plus handles to read them back.
pub struct CapturedSinks {
    pub stdout: SharedBuffer,
    pub stderr: SharedBuffer,
}

impl CapturedSinks {
    pub fn new() -> Self {
        Self {
            stdout: SharedBuffer::new(),
            stderr: SharedBuffer::new(),
        }
    }

    pub fn sinks(&self) -> Sinks<SharedBuffer, SharedBuffer> {
        Sinks {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

impl Default for CapturedSinks {
    fn default() -> Self {
        Self::new()
    }
}
