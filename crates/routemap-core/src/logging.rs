//! Logging integration for routemap.
//!
//! Provides a helper for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and a span constructor used
//! around URL building.

use crate::settings::Settings;

/// Installs the process-wide `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `settings.log_level` is used, and an
/// unparsable level falls back to `info`. Debug mode logs pretty multi-line
/// records with source locations, otherwise one JSON object per line. Both
/// write to stderr so command output on stdout stays clean.
///
/// Only the first call installs anything; later calls are no-ops.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;

    let filter = level_filter(settings);
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if settings.debug {
        builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        builder.json().with_current_span(true).try_init()
    };
    if installed.is_ok() {
        tracing::debug!(level = %settings.log_level, debug = settings.debug, "logging initialised");
    }
}

fn level_filter(settings: &Settings) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Creates a tracing span for building the URL of one endpoint.
///
/// # Examples
///
/// ```
/// use routemap_core::logging::endpoint_span;
///
/// let span = endpoint_span("events.display");
/// let _guard = span.enter();
/// tracing::debug!("building url");
/// ```
pub fn endpoint_span(endpoint: &str) -> tracing::Span {
    tracing::debug_span!("build_url", endpoint = endpoint)
}
