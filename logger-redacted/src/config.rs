// Logger configuration
use serde::{Deserialize, Serialize};

use crate::LoggerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json_output: bool,
    /// Scrub identifiers from free text before it is logged
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Fails when `LOG_REDACTION` is set to something other than `true` or `false`.
    pub fn from_env() -> Result<Self, LoggerError> {
        let defaults = Self::default();

        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let json_output = std::env::var("LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(defaults.json_output);

        let redaction_enabled = match std::env::var("LOG_REDACTION") {
            Ok(raw) => parse_flag("LOG_REDACTION", &raw)?,
            Err(_) => defaults.redaction_enabled,
        };

        Ok(Self {
            log_level,
            json_output,
            redaction_enabled,
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, LoggerError> {
    raw.trim().parse().map_err(|_| LoggerError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("LOG_REDACTION", " true").unwrap());
        assert!(!parse_flag("LOG_REDACTION", "false").unwrap());
        let err = parse_flag("LOG_REDACTION", "off").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidValue { name: "LOG_REDACTION", .. }));
        assert_eq!(err.to_string(), "Invalid value for LOG_REDACTION: off");
    }
}
