//! Tracing wiring for the service binary. Installed once at startup, before
//! the listener binds, so readiness flips are already visible in the logs.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Failure while wiring up the global subscriber.
#[derive(Debug)]
pub struct TelemetryError {
    detail: String,
    cause: TelemetryCause,
}

#[derive(Debug)]
enum TelemetryCause {
    Filter(ParseError),
    Install(SetGlobalDefaultError),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            TelemetryCause::Filter(err) => Some(err),
            TelemetryCause::Install(err) => Some(err),
        }
    }
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(resolve_filter(config)?)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|source| TelemetryError {
        detail: "a global tracing subscriber is already installed".to_string(),
        cause: TelemetryCause::Install(source),
    })
}

/// `RUST_LOG` wins when it is set and parses; otherwise the configured
/// `PULSE_LOG_LEVEL` applies.
fn resolve_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError {
        detail: format!("log filter '{}' does not parse", config.log_level),
        cause: TelemetryCause::Filter(source),
    })
}
