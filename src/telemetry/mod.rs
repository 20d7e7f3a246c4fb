//! Telemetry initialization: structured logging

use crate::config::TelemetryConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the logging stack.
///
/// `RUST_LOG` takes precedence over the built-in filter.
pub fn init(config: &TelemetryConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "userdb=info,sqlx=warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        // Flatten event fields so `message` is top-level
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }
}
