// src/lib.rs

pub mod cli;
pub mod errors;
pub mod label;
pub mod launch;
pub mod logging;
pub mod multiplex;
pub mod reconcile;
pub mod terminal;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::cli::CliArgs;
use crate::errors::Result;
use crate::label::{LabelRenderer, Labels};
use crate::launch::{ExecutionMode, Invocation, launch};
use crate::multiplex::{Multiplexer, Sinks};
use crate::reconcile::{RunReport, reconcile};
use crate::terminal::TerminalCaps;

/// High-level entry point used by `main.rs`.
///
/// Runs the child against our real stdout/stderr.
pub async fn run(args: CliArgs, caps: TerminalCaps) -> Result<RunReport> {
    let mode = args.mode();
    let invocation = Invocation::new(args.program)?;
    run_with(&invocation, mode, caps, Sinks::process()).await
}

/// Run `invocation` with explicit colorization and output sinks.
///
/// This wires together:
/// - the two label renderers (one per output stream)
/// - the launcher
/// - the multiplexer (one reader per pipe)
/// - the reconciler
///
/// The announcements are written to the stdout sink before it is handed to
/// the stdout reader, so they always precede forwarded output.
pub async fn run_with<O, E>(
    invocation: &Invocation,
    mode: ExecutionMode,
    caps: TerminalCaps,
    sinks: Sinks<O, E>,
) -> Result<RunReport>
where
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    let Sinks { mut stdout, stderr } = sinks;

    let out_renderer = LabelRenderer::new(caps.stdout);
    let err_renderer = LabelRenderer::new(caps.stderr);
    let program = out_renderer.render_program(invocation);

    announce(&mut stdout, &format!("{program}: Executing\n")).await?;

    let child = launch(invocation, mode)?;
    let pid = child.pid();
    announce(
        &mut stdout,
        &format!("{program}: PID={}\n", out_renderer.render_pid(pid)),
    )
    .await?;

    let labels = Labels::new(&out_renderer, &err_renderer, invocation, pid);
    let report_label = labels.plain.clone();

    let (pipes, termination) = child.into_parts();
    let completion = Multiplexer::start(
        pipes.stdout,
        pipes.stderr,
        labels,
        Sinks { stdout, stderr },
    );
    debug!(pid, "readers started");

    reconcile(completion, termination, &report_label).await
}

async fn announce<W>(sink: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(text.as_bytes()).await?;
    sink.flush().await?;
    Ok(())
}
