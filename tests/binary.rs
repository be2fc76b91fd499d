// tests/binary.rs
//
// Drives the built `tagexec` binary end to end.

use std::error::Error;
use std::fs;
use std::process::{Command, Stdio};

type TestResult = Result<(), Box<dyn Error>>;

fn tagexec() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tagexec"));
    cmd.env_remove("TAGEXEC_LOG");
    cmd
}

#[test]
fn missing_program_prints_usage_and_fails() -> TestResult {
    let output = tagexec().output()?;

    assert_eq!(output.status.code(), Some(255));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("Missing program to be executed."));
    Ok(())
}

#[test]
fn child_exit_status_is_logged_but_not_propagated() -> TestResult {
    let output = tagexec().args(["-shell", "exit", "7"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8(output.stderr)?;
    let warning = stderr
        .lines()
        .find(|l| l.contains("exited with status 7"))
        .ok_or("missing exit status warning")?;
    assert!(warning.contains("WARN"));
    assert!(warning.contains("[exit 7] "));
    Ok(())
}

#[test]
fn output_format_matches_across_both_streams() -> TestResult {
    let output = tagexec()
        .args(["--shell", "echo", "hello;", "echo", "oops", ">&2"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[echo hello; echo oops >&2]: Executing");

    let pid = lines[1]
        .strip_prefix("[echo hello; echo oops >&2]: PID=")
        .ok_or("missing PID line")?;
    assert!(pid.parse::<u32>().is_ok());

    let label = format!("[echo hello; echo oops >&2] {pid}");
    assert_eq!(lines[2], format!("{label} stdout: hello"));

    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr, format!("{label} stderr: oops\n"));
    Ok(())
}

#[test]
fn stdout_redirected_to_a_file_stays_plain() -> TestResult {
    let file = tempfile::NamedTempFile::new()?;
    let status = tagexec()
        .args(["echo", "to-file"])
        .env("TERM", "xterm-256color")
        .stdout(Stdio::from(file.reopen()?))
        .stderr(Stdio::null())
        .status()?;
    assert!(status.success());

    let written = fs::read_to_string(file.path())?;
    assert!(!written.contains('\u{1b}'));
    assert!(written.lines().any(|l| l.ends_with(" stdout: to-file")));
    Ok(())
}

#[test]
fn arguments_after_program_pass_through_verbatim() -> TestResult {
    let output = tagexec().args(["echo", "-n", "--shell", "x"]).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("[echo -n --shell x]: Executing\n"));
    assert!(stdout.lines().any(|l| l.ends_with(" stdout: --shell x")));
    Ok(())
}

#[test]
fn unknown_program_is_fatal() -> TestResult {
    let output = tagexec().arg("/no/such/binary").output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("ERROR"));
    assert!(stderr.contains("[/no/such/binary]: failed to start process"));
    Ok(())
}
