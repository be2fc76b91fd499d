// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;

use clap::{Parser, ValueEnum};

use crate::launch::ExecutionMode;

/// Command-line arguments for `tagexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tagexec",
    version,
    about = "Run a program and tag every line of its output with its name and PID.",
    long_about = None
)]
pub struct CliArgs {
    /// Use the shell (`sh -c`) to execute the program.
    ///
    /// All program tokens are joined with single spaces and handed to the
    /// shell as one command string.
    #[arg(long)]
    pub shell: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TAGEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Program to run, followed by its arguments.
    #[arg(
        value_name = "PROGRAM",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub program: Vec<String>,
}

impl CliArgs {
    pub fn mode(&self) -> ExecutionMode {
        if self.shell {
            ExecutionMode::ShellWrapped
        } else {
            ExecutionMode::Direct
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Rewrite single-dash long flags (`-shell`) that appear before the program
/// into their `--` form, and resolve `-shell=<bool>`. Everything from the
/// program name on is untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut iter = args.into_iter();

    // argv[0]
    if let Some(bin) = iter.next() {
        out.push(bin);
    }

    let mut expect_value = false;
    let mut in_program = false;
    for arg in iter {
        if in_program {
            out.push(arg);
            continue;
        }
        if expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }

        match arg.to_str() {
            Some("-shell") => out.push("--shell".into()),
            Some(s) if s.starts_with("-shell=") || s.starts_with("--shell=") => {
                let (_, value) = s.split_once('=').unwrap_or_default();
                match parse_bool_flag(value) {
                    Some(true) => out.push("--shell".into()),
                    Some(false) => {}
                    // Left as is so clap reports it.
                    None => out.push(arg),
                }
            }
            Some("-log-level") | Some("--log-level") => {
                expect_value = true;
                out.push("--log-level".into());
            }
            Some(s) if s.starts_with("-log-level=") => {
                out.push(format!("-{s}").into());
            }
            Some("--") => {
                in_program = true;
                out.push(arg);
            }
            Some(s) if s.starts_with('-') => out.push(arg),
            _ => {
                in_program = true;
                out.push(arg);
            }
        }
    }

    out
}

/// Boolean flag values in the spellings Go's `flag` package accepts.
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Convenience wrapper around `CliArgs::parse_from()` with flag
/// normalization applied to the process arguments.
pub fn parse() -> CliArgs {
    CliArgs::parse_from(normalize_args(std::env::args_os()))
}

/// Usage text printed when no program was given.
pub fn usage(bin: &str) -> String {
    format!(
        "Missing program to be executed. Append it after parameters.\n\
         Example: {bin} ls -lh\n\
         {bin} -shell echo '$PWD'"
    )
}
