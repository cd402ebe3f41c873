//! Logging and tracing initialization.
//!
//! Diagnostics (missing layers, failed items, placements) go through
//! `tracing` to stderr; the progress listing on stdout is separate, see
//! [`output`](crate::output).
//!
//! Items run on rayon workers, so per-item events arrive in completion
//! order, not base-name order. They are emitted inside an `item` span that
//! carries the `base_name`. The stdout listing and the batch report are
//! always in base-name order.

use tracing_subscriber::{EnvFilter, fmt};

/// Level used when neither `RUST_LOG` nor `--log-level` says otherwise.
pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive, e.g. `warn` or `mixmaker=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            json: false,
        }
    }
}

/// Filter from `RUST_LOG` if set, else from `level`, else [`DEFAULT_LEVEL`].
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize the global tracing subscriber. Later calls are no-ops.
pub fn init_logging(settings: &LogSettings) {
    let env_filter = env_filter(&settings.level);

    if settings.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
