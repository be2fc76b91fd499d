// src/logging.rs

//! Log output for `tagexec`.
//!
//! Everything we log goes to stderr. Stdout belongs to the announcements and
//! the child's forwarded stdout, and a stray log line there would end up in
//! whatever file the user redirected it to.
//!
//! The filter comes from `--log-level` when given, else from the
//! `TAGEXEC_LOG` directive string (`warn`, `tagexec=debug`, ...), else
//! `info`.

use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::MakeWriter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "TAGEXEC_LOG";

/// Pick the filter for this run.
pub fn resolve_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(lvl) => EnvFilter::new(lvl.as_directive()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// The formatter used for our log lines, writing to `writer`.
///
/// `ansi` is the stderr color decision. Labels inside messages must be plain
/// text; the formatter escapes control characters in message fields.
pub fn build_subscriber<W>(filter: EnvFilter, ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Install the process-wide subscriber writing to stderr.
pub fn init_logging(cli_level: Option<LogLevel>, ansi: bool) -> Result<()> {
    let subscriber = build_subscriber(resolve_filter(cli_level), ansi, std::io::stderr);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    Ok(())
}
