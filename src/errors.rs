// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagexecError {
    #[error("missing program to be executed")]
    Usage,

    /// The child could not be started. Pipe creation happens inside `spawn`,
    /// so a failure to set up stdout/stderr also ends up here.
    #[error("{invocation}: failed to start process: {source}")]
    Spawn {
        invocation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: failed to wait for process: {source}")]
    Wait {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{label}: terminated by signal {signal}")]
    Signaled { label: String, signal: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TagexecError>;
