//! Logging and tracing bootstrap for the bookshelf service.

use anyhow::Context;
use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` wins, the configured level is the fallback.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(format!(
        "{level},tower_http={level}",
        level = settings.log_level
    ))
    .with_context(|| format!("invalid log level '{}'", settings.log_level))
}

/// Install the global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed (tests, embedders).
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<bool> {
    let registry = tracing_subscriber::registry().with(env_filter(settings)?);

    let installed = match settings.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .is_ok(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            target: "bookshelf-telemetry",
            format = ?settings.log_format,
            level = %settings.log_level,
            "telemetry initialized"
        );
    }

    Ok(installed)
}
