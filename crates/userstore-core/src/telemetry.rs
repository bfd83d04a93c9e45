//! Tracing subscriber initialisation.
//!
//! The store itself only emits `tracing` events; installing a subscriber is
//! left to the embedding application (or the test harness) through
//! [`init_tracing`].

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::UserStoreResult;
use serde::{Deserialize, Serialize};

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json_output: bool,

    /// Whether to install a console layer at all.
    #[serde(default = "default_console_output")]
    pub console_output: bool,
}

fn default_log_level() -> String {
    "info,userstore=debug,sqlx=warn".to_string()
}

fn default_console_output() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_output: false,
            console_output: default_console_output(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Calling this more than once is harmless: a second call leaves the
/// existing subscriber in place.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> UserStoreResult<()> {
    if !config.console_output {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| crate::UserStoreError::configuration(format!("Invalid log filter: {}", e)))?;

    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    match result {
        Ok(()) => tracing::info!(json = config.json_output, "Tracing initialized"),
        Err(e) => tracing::debug!("Tracing subscriber already set: {}", e),
    }

    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> UserStoreResult<()> {
    Ok(())
}
