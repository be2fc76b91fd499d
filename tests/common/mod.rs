#![allow(dead_code)]

pub use tagexec_test_utils::buffer::{BrokenSink, SharedBuffer};
pub use tagexec_test_utils::builders::{CapturedSinks, InvocationBuilder};
pub use tagexec_test_utils::init_tracing;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// True when `s` contains an ANSI escape sequence.
pub fn has_ansi(s: &str) -> bool {
    s.contains('\u{1b}')
}
