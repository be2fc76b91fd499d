pub mod builders;
pub mod buffer;

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::TestWriter;

static INIT: Once = Once::new();

/// Install the crate's log formatter as the global subscriber, once per test
/// binary.
///
/// Output goes through the harness capture, so it only shows up next to a
/// failing test. The filter is read from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tagexec::logging::build_subscriber(filter, false, TestWriter::new());
        // Another harness may already have installed one.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
