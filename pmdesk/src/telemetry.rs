//! Tracing setup.
//!
//! Every crate in the workspace logs through `tracing`. Applications pick
//! where the events go; these helpers install a `tracing-subscriber` fmt
//! subscriber filtered by `RUST_LOG`.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "pmdesk=info";

/// Environment variable selecting the output format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "PMDESK_LOG_FORMAT";

/// Error installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directives did not parse.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Read the format from `PMDESK_LOG_FORMAT`, defaulting to text.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Install the subscriber using `RUST_LOG`, or [`DEFAULT_FILTER`] when it
/// is unset or does not parse.
///
/// Does nothing if a subscriber is already installed.
pub fn init() {
    let filter =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let format = LogFormat::from_env();
    if let Err(TelemetryError::InvalidFilter(_)) = install(&filter, format) {
        let _ = install(DEFAULT_FILTER, format);
    }
}

/// Install the subscriber with explicit filter directives.
pub fn try_init(filter: &str) -> Result<(), TelemetryError> {
    install(filter, LogFormat::from_env())
}

/// Install the subscriber with explicit directives and format.
pub fn try_init_with(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    install(filter, format)
}

fn install(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.finish().try_init()?,
        LogFormat::Json => builder.json().finish().try_init()?,
    }
    Ok(())
}
