//! Structured logging with PHI redaction for clinical text
//!
//! Transcripts are protected health information, so engine crates never log
//! them verbatim: they log a [`PhiRedactor::fingerprint`] for correlation and,
//! at debug level, redacted snippets.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, LoggerConfig, PhiRedactor};
//! use tracing::info;
//!
//! let config = LoggerConfig::from_env().expect("valid logging environment");
//! init_logging(&config).expect("logger already installed");
//!
//! let transcript = "Patient MRN 123456 reports chest pain.";
//! info!(transcript = %PhiRedactor::fingerprint(transcript), "Transcript received");
//! ```
//!
//! # Environment
//!
//! - `RUST_LOG`: standard filter directives, takes precedence over `LOG_LEVEL`
//! - `LOG_LEVEL`: fallback level (default `info`)
//! - `LOG_FORMAT=json`: structured JSON output
//! - `LOG_REDACTION=false`: disable redaction of debug snippets

pub mod redactor;
pub mod config;

pub use redactor::*;
pub use config::*;

use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails when the configured level is not a valid filter directive or when a
/// global subscriber is already installed.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            source,
        })?,
    };

    if config.json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init()?;
    }

    Ok(())
}

/// Redactor matching the logger configuration, `None` when redaction is off.
pub fn redactor_for(config: &LoggerConfig) -> Option<PhiRedactor> {
    config.redaction_enabled.then(PhiRedactor::default)
}
