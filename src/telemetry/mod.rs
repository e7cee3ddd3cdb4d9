//! Structured logging setup

use crate::config::TelemetryConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "mail_dispatch=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. With `log_format = "json"` each
/// event is one JSON object with its fields flattened to the top level, so
/// `message` and `to` sit next to `level`.
pub fn init(config: &TelemetryConfig) {
    let registry = tracing_subscriber::registry().with(env_filter());

    if config.log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true);
        registry.with(fmt_layer).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!(
        service = %config.service_name,
        format = %config.log_format,
        "Logging initialised"
    );
}
