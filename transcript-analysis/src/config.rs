use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::ConfidencePolicy;
use crate::error::{AnalysisError, AnalysisResult};

/// Analysis engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Reject transcripts longer than this many characters; unbounded when `None`
    pub max_transcript_chars: Option<usize>,
    pub matched_confidence: f32,
    pub default_confidence: f32,
    /// JSON lexicon definition replacing the built-in vocabulary
    pub lexicon_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let confidence = ConfidencePolicy::default();
        Self {
            max_transcript_chars: None,
            matched_confidence: confidence.matched,
            default_confidence: confidence.unmatched,
            lexicon_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Fails when a variable is present but unparseable, or the resulting
    /// configuration does not pass [`AnalysisConfig::validate`].
    pub fn from_env() -> AnalysisResult<Self> {
        let defaults = Self::default();

        let max_transcript_chars = match std::env::var("ANALYSIS_MAX_TRANSCRIPT_CHARS") {
            Ok(raw) => Some(parse_var("ANALYSIS_MAX_TRANSCRIPT_CHARS", &raw)?),
            Err(_) => defaults.max_transcript_chars,
        };

        let matched_confidence = match std::env::var("ANALYSIS_MATCHED_CONFIDENCE") {
            Ok(raw) => parse_var("ANALYSIS_MATCHED_CONFIDENCE", &raw)?,
            Err(_) => defaults.matched_confidence,
        };

        let default_confidence = match std::env::var("ANALYSIS_DEFAULT_CONFIDENCE") {
            Ok(raw) => parse_var("ANALYSIS_DEFAULT_CONFIDENCE", &raw)?,
            Err(_) => defaults.default_confidence,
        };

        let lexicon_path = std::env::var("ANALYSIS_LEXICON_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            max_transcript_chars,
            matched_confidence,
            default_confidence,
            lexicon_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Rejects confidences outside `[0, 1]` and a zero length bound.
    pub fn validate(&self) -> AnalysisResult<()> {
        for (name, value) in [
            ("matched_confidence", self.matched_confidence),
            ("default_confidence", self.default_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.max_transcript_chars == Some(0) {
            return Err(AnalysisError::Config(
                "max_transcript_chars must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn confidence_policy(&self) -> ConfidencePolicy {
        ConfidencePolicy {
            matched: self.matched_confidence,
            unmatched: self.default_confidence,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> AnalysisResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AnalysisError::Config(format!("{} has an invalid value: {}", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.matched_confidence, 0.8);
        assert_eq!(config.default_confidence, 0.5);
        assert!(config.max_transcript_chars.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let config = AnalysisConfig {
            matched_confidence: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));

        let config = AnalysisConfig {
            default_confidence: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_length_bound_rejected() {
        let config = AnalysisConfig {
            max_transcript_chars: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"max_transcript_chars": 5000}"#).unwrap();
        assert_eq!(config.max_transcript_chars, Some(5000));
        assert_eq!(config.matched_confidence, 0.8);
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var::<usize>("X", " 42 ").unwrap(), 42);
        assert!(parse_var::<f32>("X", "high").is_err());
    }
}
