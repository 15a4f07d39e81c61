//! Tracing subscriber set-up for the `hpe` binary.
//!
//! Log lines go to stderr so report output on stdout stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_ENV: &str = "HPE_LOG";

/// Filter from `HPE_LOG` when set, otherwise `level`.
pub fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(level: &str) {
    let initialized = tracing_subscriber::registry()
        .with(log_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(level, "logging initialized");
    }
}
