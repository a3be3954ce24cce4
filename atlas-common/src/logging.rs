//! Logging utilities for Atlas binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! left to the binary that embeds them.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log levels accepted by [`init_logging`].
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Output formats accepted by [`init_logging`].
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Build the EnvFilter for the given base level.
///
/// `RUST_LOG` wins when set.
fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(log_level)
}

/// Initialize logging with the given configuration.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - Output format: "json" for structured JSON, "pretty" for human-readable
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
/// Calling this more than once is harmless: later calls are ignored.
pub fn init_logging(log_level: &str, log_format: &str) {
    let filter = build_filter(log_level);

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        "Logging initialized"
    );
}
