// src/multiplex.rs

//! Concurrent line forwarding from the child's pipes to our own streams.
//!
//! Each pipe gets its own Tokio task. A reader owns its pipe and its output
//! sink outright, so nothing is shared between the two tasks and no lock is
//! needed: every destination stream has exactly one writer.
//!
//! Lines are split on `\n` at the byte level (a trailing `\r` is dropped too)
//! and forwarded as raw bytes, so output that isn't valid UTF-8 passes
//! through unchanged. A final line without a newline is still forwarded.
//!
//! When a reader is done it fires its [`CompletionSignal`] exactly once. A
//! read error ends the reader just like EOF does; the [`StreamEnd`] in the
//! summary records which one it was.

use std::fmt;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::label::{Label, Labels};

/// Which of the child's streams a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamName {
    Stdout,
    Stderr,
}

impl StreamName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamName::Stdout => "stdout",
            StreamName::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reader's pipe came to an end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    Eof,
    ReadError(String),
}

/// What a reader reports when it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSummary {
    pub stream: StreamName,
    /// Lines read from the pipe, whether or not they could be written.
    pub lines: usize,
    pub end: StreamEnd,
    /// Set when writing to the output sink failed at some point.
    pub sink_failed: bool,
}

/// One-shot "this reader is done" event.
#[derive(Debug)]
pub struct CompletionSignal {
    stream: StreamName,
    rx: oneshot::Receiver<ReaderSummary>,
}

impl CompletionSignal {
    pub fn stream(&self) -> StreamName {
        self.stream
    }

    /// Wait for the reader to finish.
    ///
    /// A reader that went away without reporting (it panicked) still counts
    /// as finished.
    pub async fn wait(self) -> ReaderSummary {
        match self.rx.await {
            Ok(summary) => summary,
            Err(_) => {
                warn!(stream = %self.stream, "reader ended without reporting completion");
                ReaderSummary {
                    stream: self.stream,
                    lines: 0,
                    end: StreamEnd::ReadError("reader task dropped".to_string()),
                    sink_failed: false,
                }
            }
        }
    }
}

/// The two completion signals handed to the reconciler.
#[derive(Debug)]
pub struct Completion {
    pub stdout: CompletionSignal,
    pub stderr: CompletionSignal,
}

/// Where forwarded lines are written.
#[derive(Debug)]
pub struct Sinks<O, E> {
    pub stdout: O,
    pub stderr: E,
}

impl Sinks<tokio::io::Stdout, tokio::io::Stderr> {
    /// Our own process stdout and stderr.
    pub fn process() -> Self {
        Self {
            stdout: tokio::io::stdout(),
            stderr: tokio::io::stderr(),
        }
    }
}

/// Starts one reader per pipe.
pub struct Multiplexer;

impl Multiplexer {
    pub fn start<PO, PE, O, E>(
        stdout_pipe: PO,
        stderr_pipe: PE,
        labels: Labels,
        sinks: Sinks<O, E>,
    ) -> Completion
    where
        PO: AsyncRead + Unpin + Send + 'static,
        PE: AsyncRead + Unpin + Send + 'static,
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        let stdout = spawn_reader(StreamName::Stdout, stdout_pipe, sinks.stdout, labels.stdout);
        let stderr = spawn_reader(StreamName::Stderr, stderr_pipe, sinks.stderr, labels.stderr);
        Completion { stdout, stderr }
    }
}

/// Spawn a single reader task and return its completion signal.
pub fn spawn_reader<P, W>(stream: StreamName, pipe: P, sink: W, label: Label) -> CompletionSignal
where
    P: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let summary = forward_lines(stream, pipe, sink, &label).await;
        debug!(
            %stream,
            lines = summary.lines,
            end = ?summary.end,
            "reader finished"
        );
        // The receiver may already be gone if the run was abandoned.
        let _ = tx.send(summary);
    });

    CompletionSignal { stream, rx }
}

/// Build one output line: `<label> <stream>: <line>\n`.
pub fn format_line(label: &Label, stream: StreamName, line: &[u8]) -> Vec<u8> {
    let prefix = format!("{label} {stream}: ");
    let mut out = Vec::with_capacity(prefix.len() + line.len() + 1);
    out.extend_from_slice(prefix.as_bytes());
    out.extend_from_slice(line);
    out.push(b'\n');
    out
}

/// Drop the line terminator (`\n` or `\r\n`) in place.
pub fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

async fn forward_lines<P, W>(stream: StreamName, pipe: P, mut sink: W, label: &Label) -> ReaderSummary
where
    P: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut lines = 0usize;
    let mut sink_failed = false;

    let end = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break StreamEnd::Eof,
            Ok(_) => {
                strip_line_ending(&mut buf);
                lines += 1;

                if sink_failed {
                    // Keep draining so the child never blocks on a full pipe.
                    continue;
                }

                let out = format_line(label, stream, &buf);
                if let Err(e) = write_line(&mut sink, &out).await {
                    warn!(
                        %stream,
                        error = %e,
                        "failed to write forwarded output; discarding the rest"
                    );
                    sink_failed = true;
                }
            }
            Err(e) => {
                debug!(%stream, error = %e, "read error on child pipe");
                break StreamEnd::ReadError(e.to_string());
            }
        }
    };

    ReaderSummary {
        stream,
        lines,
        end,
        sink_failed,
    }
}

async fn write_line<W>(sink: &mut W, out: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(out).await?;
    sink.flush().await
}
