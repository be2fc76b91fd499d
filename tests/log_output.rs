// tests/log_output.rs
//
// Log lines as they look on a color terminal: the formatter colors the level
// itself and must not be fed labels that already carry escapes.

mod common;
use crate::common::{CapturedSinks, InvocationBuilder, SharedBuffer, TestResult, has_ansi};

use tracing_subscriber::EnvFilter;

use tagexec::errors::TagexecError;
use tagexec::logging::build_subscriber;
use tagexec::reconcile::RunOutcome;
use tagexec::run_with;
use tagexec::terminal::TerminalCaps;

fn color_terminal() -> TerminalCaps {
    TerminalCaps {
        stdout: true,
        stderr: true,
    }
}

fn has_escaped_control(text: &str) -> bool {
    text.contains("\\x1b") || text.contains("\\u{1b}") || text.contains("\\e[")
}

#[tokio::test]
async fn exit_warning_keeps_a_readable_label_with_ansi_on() -> TestResult {
    let log = SharedBuffer::new();
    let writer = log.clone();
    let _guard = tracing::subscriber::set_default(build_subscriber(
        EnvFilter::new("warn"),
        true,
        move || writer.clone(),
    ));

    let (inv, mode) = InvocationBuilder::shell("echo oops >&2; exit 7").build();
    let captured = CapturedSinks::new();
    let report = run_with(&inv, mode, color_terminal(), captured.sinks()).await?;

    match &report.outcome {
        RunOutcome::NonZeroExit { label, code } => {
            assert_eq!(*code, 7);
            assert!(!has_ansi(label.as_str()), "label: {label:?}");
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }

    let text = log.contents();
    assert!(!has_escaped_control(&text), "log: {text:?}");
    assert!(
        text.contains(&format!(
            "[echo oops >&2; exit 7] {} exited with status 7",
            report.pid
        )),
        "log: {text:?}"
    );

    // Forwarded lines keep their colored label.
    assert!(has_ansi(&captured.stderr.contents()));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn fatal_errors_carry_a_plain_label() -> TestResult {
    let (inv, mode) = InvocationBuilder::shell("kill -TERM $$").build();
    let captured = CapturedSinks::new();

    match run_with(&inv, mode, color_terminal(), captured.sinks()).await {
        Err(err @ TagexecError::Signaled { .. }) => {
            assert!(!has_ansi(&err.to_string()), "error: {err}");
        }
        Err(e) => panic!("expected Signaled error, got: {e:?}"),
        Ok(r) => panic!("expected error, got {:?}", r.outcome),
    }
    Ok(())
}
