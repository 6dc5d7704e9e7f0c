//! Diagnostic logging to stderr.
//!
//! Store warnings (such as an unreadable store being shown as empty) are
//! visible by default. Set `TT_LOG` (EnvFilter syntax, e.g. `debug` or
//! `task_tracker=trace`) for more.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "TT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. Never panics; a second call is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
