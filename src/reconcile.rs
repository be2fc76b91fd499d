// src/reconcile.rs

//! Joining both readers and the process exit into a final report.
//!
//! The sequence is fixed:
//!
//! ```text
//! WaitingBoth -> WaitingOne -> BothDone -> ProcessWaited -> Reported
//! ```
//!
//! The process is only waited on once both readers have signalled, so the
//! exit report can never be printed ahead of forwarded output.
//!
//! [`ReconcileState`] is the pure transition table; [`reconcile`] is the async
//! shell that drives it.

use std::fmt;

use tracing::{debug, warn};

use crate::errors::{Result, TagexecError};
use crate::label::Label;
use crate::launch::{ExitOutcome, Termination};
use crate::multiplex::{Completion, ReaderSummary, StreamName};

/// Reconciler progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    WaitingBoth,
    WaitingOne { pending: StreamName },
    BothDone,
    ProcessWaited,
    Reported,
}

/// Inputs that move the reconciler forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileEvent {
    ReaderDone(StreamName),
    ProcessExited,
    ReportEmitted,
}

impl ReconcileState {
    /// Apply one event. Events that don't fit the current state leave it
    /// unchanged.
    pub fn advance(self, event: ReconcileEvent) -> Self {
        use ReconcileEvent::*;
        use ReconcileState::*;

        match (self, event) {
            (WaitingBoth, ReaderDone(StreamName::Stdout)) => WaitingOne {
                pending: StreamName::Stderr,
            },
            (WaitingBoth, ReaderDone(StreamName::Stderr)) => WaitingOne {
                pending: StreamName::Stdout,
            },
            (WaitingOne { pending }, ReaderDone(done)) if pending == done => BothDone,
            (BothDone, ProcessExited) => ProcessWaited,
            (ProcessWaited, ReportEmitted) => Reported,
            (state, _) => state,
        }
    }

    /// Whether the process may be waited on yet.
    pub fn may_wait(&self) -> bool {
        matches!(self, ReconcileState::BothDone)
    }
}

/// The non-fatal result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// The child ran and exited with a non-zero status.
    NonZeroExit { label: Label, code: i32 },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => f.write_str("exited successfully"),
            RunOutcome::NonZeroExit { label, code } => {
                write!(f, "{label} exited with status {code}")
            }
        }
    }
}

/// Everything known once a run has been reconciled.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub pid: u32,
    pub outcome: RunOutcome,
    pub stdout: ReaderSummary,
    pub stderr: ReaderSummary,
}

/// Wait for both readers, then for the process, then classify and report.
///
/// A clean non-zero exit is logged as a warning and returned as
/// [`RunOutcome::NonZeroExit`]. A signal or a failing `wait` call is an error.
///
/// `label` ends up in log messages and errors, so pass the escape-free one
/// ([`Labels::plain`](crate::label::Labels::plain)).
pub async fn reconcile(
    completion: Completion,
    termination: Termination,
    label: &Label,
) -> Result<RunReport> {
    let pid = termination.pid();
    let mut state = ReconcileState::WaitingBoth;

    let Completion { stdout, stderr } = completion;
    let stdout_done = stdout.wait();
    let stderr_done = stderr.wait();
    tokio::pin!(stdout_done, stderr_done);

    let mut stdout_summary: Option<ReaderSummary> = None;
    let mut stderr_summary: Option<ReaderSummary> = None;

    let (stdout, stderr) = loop {
        tokio::select! {
            summary = &mut stdout_done, if stdout_summary.is_none() => {
                state = state.advance(ReconcileEvent::ReaderDone(StreamName::Stdout));
                stdout_summary = Some(summary);
            }
            summary = &mut stderr_done, if stderr_summary.is_none() => {
                state = state.advance(ReconcileEvent::ReaderDone(StreamName::Stderr));
                stderr_summary = Some(summary);
            }
        }
        debug!(pid, ?state, "reader completion observed");

        match (stdout_summary.take(), stderr_summary.take()) {
            (Some(out), Some(err)) => break (out, err),
            (out, err) => {
                stdout_summary = out;
                stderr_summary = err;
            }
        }
    };
    debug_assert!(state.may_wait());

    let exit = termination.wait().await;
    state = state.advance(ReconcileEvent::ProcessExited);
    debug!(pid, ?state, ?exit, "process wait returned");

    let outcome = match exit {
        Ok(ExitOutcome::Success) => RunOutcome::Success,
        Ok(ExitOutcome::Failed(code)) => RunOutcome::NonZeroExit {
            label: label.clone(),
            code,
        },
        Ok(ExitOutcome::Signaled(signal)) => {
            return Err(TagexecError::Signaled {
                label: label.to_string(),
                signal,
            });
        }
        Err(source) => {
            return Err(TagexecError::Wait {
                label: label.to_string(),
                source,
            });
        }
    };

    if let RunOutcome::NonZeroExit { .. } = outcome {
        warn!("{outcome}");
    }
    state = state.advance(ReconcileEvent::ReportEmitted);
    debug!(pid, ?state, "run reconciled");

    Ok(RunReport {
        pid,
        outcome,
        stdout,
        stderr,
    })
}
