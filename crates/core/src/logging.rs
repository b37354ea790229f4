//! Tracing initialization.
//!
//! [`init_tracing`] installs the global subscriber in one of two modes:
//! - **JSON mode** (`logging.json = true`): one JSON object per line with
//!   nanosecond UTC timestamps, for log aggregation.
//! - **Pretty mode**: human-readable output for local runs.
//!
//! `RUST_LOG` takes precedence over `logging.level` when set
//! (e.g., `RUST_LOG=ox_oms=debug`).

use std::fmt;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Examples
///
/// ```no_run
/// let cfg = ox_core::config::LoggingConfig::default();
/// ox_core::logging::init_tracing(&cfg);
/// ```
pub fn init_tracing(cfg: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&cfg.level));

    if cfg.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(NanosecondTimer)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE);

        registry.with(json_layer).init();
    } else {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false);

        registry.with(pretty_layer).init();
    }
}

/// `RUST_LOG` if present and valid, else `level`, else `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Timer emitting RFC 3339 UTC timestamps with nanosecond precision.
#[derive(Debug, Clone)]
struct NanosecondTimer;

impl tracing_subscriber::fmt::time::FormatTime for NanosecondTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let now = chrono::Utc::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.9fZ"))
    }
}
