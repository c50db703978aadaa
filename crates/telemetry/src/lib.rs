//! Tracing/logging bootstrap.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use libris_kernel::settings::{LogFormat, TelemetrySettings};

/// Build the filter, preferring `RUST_LOG` over the configured directive.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .with_context(|| format!("invalid log filter '{}'", settings.filter)),
    }
}

/// Install the global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, which happens
/// when tests or embedding binaries set one up first.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<bool> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().flatten_event(true).try_init().is_ok(),
    };

    if installed {
        tracing::info!(
            target: "libris-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
    Ok(installed)
}
