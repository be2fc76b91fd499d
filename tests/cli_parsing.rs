// tests/cli_parsing.rs

use std::ffi::OsString;

use clap::Parser;

use tagexec::cli::{CliArgs, normalize_args, usage};
use tagexec::launch::ExecutionMode;

fn os(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::parse_from(normalize_args(os(args)))
}

#[test]
fn single_dash_shell_flag_is_normalized() {
    assert_eq!(
        normalize_args(os(&["tagexec", "-shell", "echo", "$PWD"])),
        os(&["tagexec", "--shell", "echo", "$PWD"])
    );
}

#[test]
fn flags_after_the_program_are_left_alone() {
    assert_eq!(
        normalize_args(os(&["tagexec", "ls", "-shell", "-lh"])),
        os(&["tagexec", "ls", "-shell", "-lh"])
    );
}

#[test]
fn log_level_value_is_not_mistaken_for_the_program() {
    let args = parse(&["tagexec", "-log-level", "debug", "make", "all"]);
    assert!(args.log_level.is_some());
    assert_eq!(args.program, vec!["make".to_string(), "all".to_string()]);
}

#[test]
fn direct_mode_by_default() {
    let args = parse(&["tagexec", "ls", "-lh"]);
    assert_eq!(args.mode(), ExecutionMode::Direct);
    assert_eq!(args.program, vec!["ls".to_string(), "-lh".to_string()]);
}

#[test]
fn shell_flag_selects_shell_mode() {
    let args = parse(&["tagexec", "-shell", "echo", "'$PWD'"]);
    assert_eq!(args.mode(), ExecutionMode::ShellWrapped);
    assert_eq!(args.program, vec!["echo".to_string(), "'$PWD'".to_string()]);

    let args = parse(&["tagexec", "--shell", "true"]);
    assert_eq!(args.mode(), ExecutionMode::ShellWrapped);
}

#[test]
fn missing_program_parses_to_empty_invocation() {
    let args = parse(&["tagexec"]);
    assert!(args.program.is_empty());
}

#[test]
fn usage_mentions_both_forms() {
    let text = usage("tagexec");
    assert!(text.starts_with("Missing program to be executed."));
    assert!(text.contains("tagexec ls -lh"));
    assert!(text.contains("tagexec -shell echo '$PWD'"));
}

#[test]
fn shell_flag_accepts_go_style_bool_values() {
    for on in ["-shell=true", "-shell=1", "--shell=T", "-shell=True"] {
        let args = parse(&["tagexec", on, "echo", "hi"]);
        assert_eq!(args.mode(), ExecutionMode::ShellWrapped, "{on}");
        assert_eq!(args.program, vec!["echo".to_string(), "hi".to_string()]);
    }

    for off in ["-shell=false", "-shell=0", "--shell=F"] {
        let args = parse(&["tagexec", off, "echo", "hi"]);
        assert_eq!(args.mode(), ExecutionMode::Direct, "{off}");
        assert_eq!(args.program, vec!["echo".to_string(), "hi".to_string()]);
    }
}

#[test]
fn invalid_shell_value_is_left_for_clap_to_reject() {
    assert_eq!(
        normalize_args(os(&["tagexec", "-shell=maybe", "ls"])),
        os(&["tagexec", "-shell=maybe", "ls"])
    );
    assert!(CliArgs::try_parse_from(normalize_args(os(&["tagexec", "--shell=maybe", "ls"]))).is_err());
}

#[test]
fn shell_value_after_program_is_an_argument() {
    let args = parse(&["tagexec", "env", "-shell=false"]);
    assert_eq!(args.mode(), ExecutionMode::Direct);
    assert_eq!(args.program, vec!["env".to_string(), "-shell=false".to_string()]);
}
