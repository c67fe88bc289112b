use base64::{engine::general_purpose, Engine as _};
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

mod patterns {
    // Literal patterns; exercised by the tests at the bottom of this file.
    #![allow(clippy::unwrap_used)]

    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
        pub static ref PHONE_REGEX: Regex = Regex::new(r"(?:\+1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s][0-9]{4}\b").unwrap();
        pub static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
        pub static ref MRN_REGEX: Regex = Regex::new(r"(?i)\bMRN[-:#\s]*\d+\b").unwrap();
        pub static ref DATE_REGEX: Regex = Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap();
    }
}

use patterns::{DATE_REGEX, EMAIL_REGEX, MRN_REGEX, PHONE_REGEX, SSN_REGEX};

/// PHI redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_mrn: bool,
    pub redact_dates: bool,
    /// Replace matches with a short hash instead of a fixed mask
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_mrn: true,
            redact_dates: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// Scrubs direct identifiers out of clinical free text before it is logged.
///
/// Clinical vocabulary is left intact so debug logs stay useful; only the
/// identifier shapes configured in [`RedactionConfig`] are replaced.
#[derive(Debug, Clone)]
pub struct PhiRedactor {
    config: RedactionConfig,
}

impl Default for PhiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

impl PhiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", "***@***");
        }
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", "***-**-****");
        }
        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", "(***) ***-****");
        }
        if self.config.redact_mrn {
            result = self.replace(&MRN_REGEX, &result, "MRN", "MRN[REDACTED]");
        }
        if self.config.redact_dates {
            result = self.replace(&DATE_REGEX, &result, "DATE", "**/**/****");
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }

    /// Stable short identifier for a piece of text, safe to log in place of it.
    pub fn fingerprint(text: &str) -> String {
        let digest = Sha256::digest(text.as_bytes());
        // First 8 bytes only
        general_purpose::URL_SAFE_NO_PAD.encode(digest.get(..8).unwrap_or_default())
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{}[{}]", label, Self::fingerprint(matched))
                } else {
                    mask.to_string()
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PhiRedactor {
        PhiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking_redactor().redact("Results sent to john.doe@example.com today");
        assert_eq!(redacted, "Results sent to ***@*** today");
    }

    #[test]
    fn test_phone_redaction() {
        let redacted = masking_redactor().redact("Call the patient at (555) 123-4567");
        assert!(redacted.contains("(***) ***-****"));
        assert!(!redacted.contains("4567"));
    }

    #[test]
    fn test_mrn_and_date_redaction() {
        let redacted = masking_redactor().redact("MRN 123456 seen on 03/14/2024");
        assert_eq!(redacted, "MRN[REDACTED] seen on **/**/****");
    }

    #[test]
    fn test_clinical_measurements_survive() {
        let text = "Blood pressure 120/80, temperature 38.5C, pulse 72 bpm";
        assert_eq!(masking_redactor().redact(text), text);
    }

    #[test]
    fn test_hashed_redaction_is_stable() {
        let redactor = PhiRedactor::default();
        let first = redactor.redact("SSN 123-45-6789");
        let second = redactor.redact("SSN 123-45-6789");
        assert_eq!(first, second);
        assert!(first.starts_with("SSN SSN["));
        assert!(!first.contains("6789"));
    }

    #[test]
    fn test_fingerprint_is_short_and_deterministic() {
        let a = PhiRedactor::fingerprint("Patient complains of headache.");
        let b = PhiRedactor::fingerprint("Patient complains of headache.");
        let c = PhiRedactor::fingerprint("Patient complains of nausea.");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 11);
    }

    #[test]
    fn test_custom_pattern() {
        let redactor = PhiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            custom_patterns: vec![(Regex::new(r"\bRoom \d+").unwrap(), "Room [REDACTED]".to_string())],
            ..Default::default()
        });
        assert_eq!(redactor.redact("Moved to Room 12"), "Moved to Room [REDACTED]");
    }
}
