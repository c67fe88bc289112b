//! Whole-transcript severity and urgency classification.
//!
//! Both classifiers are first-match: levels are tested in the fixed order of
//! [`SEVERITY_CHECK_ORDER`](crate::lexicon::SEVERITY_CHECK_ORDER) and
//! [`URGENCY_CHECK_ORDER`](crate::lexicon::URGENCY_CHECK_ORDER), and the first
//! level with any keyword present is the result. A later level never
//! overrides an earlier one, whatever its position in the text.

use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, SeverityLevel, TermSet, UrgencyLevel};

/// Confidence assigned to keyword-matched and default outcomes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    pub matched: f32,
    pub unmatched: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            matched: 0.8,
            unmatched: 0.5,
        }
    }
}

/// Outcome of one aggregate classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult<L> {
    pub level: L,
    pub confidence: f32,
    /// Human-readable reasons, in lexicon order
    pub evidence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

pub type SeverityAssessment = ClassificationResult<SeverityLevel>;
pub type UrgencyAssessment = ClassificationResult<UrgencyLevel>;

pub struct AggregateClassifier<'a> {
    lexicon: &'a Lexicon,
    confidence: ConfidencePolicy,
}

impl<'a> AggregateClassifier<'a> {
    pub fn new(lexicon: &'a Lexicon, confidence: ConfidencePolicy) -> Self {
        Self { lexicon, confidence }
    }

    /// Defaults to `mild` when no severity keyword is present
    pub fn classify_severity(&self, transcript: &str) -> SeverityAssessment {
        let lowered = transcript.to_lowercase();
        match first_match(self.lexicon.severity(), &lowered) {
            Some((level, evidence)) => ClassificationResult {
                level,
                confidence: self.confidence.matched,
                evidence,
                recommendation: None,
            },
            None => ClassificationResult {
                level: SeverityLevel::Mild,
                confidence: self.confidence.unmatched,
                evidence: vec!["No severity indicators found".to_string()],
                recommendation: None,
            },
        }
    }

    /// Defaults to `routine` when no urgency keyword is present
    pub fn classify_urgency(&self, transcript: &str) -> UrgencyAssessment {
        let lowered = transcript.to_lowercase();
        let (level, confidence, evidence) = match first_match(self.lexicon.urgency(), &lowered) {
            Some((level, evidence)) => (level, self.confidence.matched, evidence),
            None => (
                UrgencyLevel::Routine,
                self.confidence.unmatched,
                vec!["No urgent or emergency indicators found".to_string()],
            ),
        };
        ClassificationResult {
            level,
            confidence,
            evidence,
            recommendation: Some(level.recommendation().to_string()),
        }
    }
}

fn first_match<K>(sets: &[TermSet<K>], lowered: &str) -> Option<(K, Vec<String>)>
where
    K: Copy + std::fmt::Display,
{
    sets.iter().find_map(|set| {
        let evidence: Vec<String> = set
            .matches_in(lowered)
            .map(|keyword| format!("Found {} indicator: {}", set.key(), keyword))
            .collect();
        (!evidence.is_empty()).then(|| (set.key(), evidence))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(lexicon: &Lexicon) -> AggregateClassifier<'_> {
        AggregateClassifier::new(lexicon, ConfidencePolicy::default())
    }

    #[test]
    fn test_severity_default_is_mild() {
        let lexicon = Lexicon::standard();
        let result = classifier(&lexicon).classify_severity("Patient reports a cough.");
        assert_eq!(result.level, SeverityLevel::Mild);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.evidence, vec!["No severity indicators found"]);
        assert_eq!(result.recommendation, None);
    }

    #[test]
    fn test_severity_first_match_in_check_order() {
        let lexicon = Lexicon::standard();
        let result = classifier(&lexicon).classify_severity("Mild rash last week, now SEVERE pain.");
        assert_eq!(result.level, SeverityLevel::Severe);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.evidence, vec!["Found severe indicator: severe"]);
    }

    #[test]
    fn test_severity_collects_all_keywords_of_winning_level() {
        let lexicon = Lexicon::standard();
        let result = classifier(&lexicon).classify_severity("A slight, minimal discomfort");
        assert_eq!(result.level, SeverityLevel::Mild);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(
            result.evidence,
            vec![
                "Found mild indicator: slight",
                "Found mild indicator: light",
                "Found mild indicator: minimal",
            ]
        );
    }

    #[test]
    fn test_urgency_emergency_phrase() {
        let lexicon = Lexicon::standard();
        let result = classifier(&lexicon).classify_urgency("He has chest pain and is worrying");
        assert_eq!(result.level, UrgencyLevel::Emergency);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.evidence, vec!["Found emergency indicator: chest pain"]);
        assert_eq!(
            result.recommendation.as_deref(),
            Some("Immediate emergency care recommended")
        );
    }

    #[test]
    fn test_urgency_urgent_and_routine() {
        let lexicon = Lexicon::standard();
        let urgent = classifier(&lexicon).classify_urgency("Symptoms getting worse since Monday");
        assert_eq!(urgent.level, UrgencyLevel::Urgent);
        assert_eq!(
            urgent.recommendation.as_deref(),
            Some("Prompt medical attention recommended")
        );

        let routine = classifier(&lexicon).classify_urgency("Chronic knee ache");
        assert_eq!(routine.level, UrgencyLevel::Routine);
        assert_eq!(routine.confidence, 0.8);
    }

    #[test]
    fn test_urgency_default_is_routine() {
        let lexicon = Lexicon::standard();
        let result = classifier(&lexicon).classify_urgency("");
        assert_eq!(result.level, UrgencyLevel::Routine);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.evidence, vec!["No urgent or emergency indicators found"]);
        assert_eq!(result.recommendation.as_deref(), Some("Regular follow-up recommended"));
    }

    #[test]
    fn test_custom_confidence_policy() {
        let lexicon = Lexicon::standard();
        let policy = ConfidencePolicy {
            matched: 0.9,
            unmatched: 0.3,
        };
        let classifier = AggregateClassifier::new(&lexicon, policy);
        assert_eq!(classifier.classify_severity("moderate").confidence, 0.9);
        assert_eq!(classifier.classify_severity("").confidence, 0.3);
    }

    #[test]
    fn test_serialized_shape() {
        let lexicon = Lexicon::standard();
        let severity = classifier(&lexicon).classify_severity("severe");
        let json = serde_json::to_value(&severity).unwrap();
        assert_eq!(json["level"], "severe");
        assert!(json.get("recommendation").is_none());

        let urgency = classifier(&lexicon).classify_urgency("stroke");
        let json = serde_json::to_value(&urgency).unwrap();
        assert_eq!(json["level"], "emergency");
        assert_eq!(json["recommendation"], "Immediate emergency care recommended");
    }
}
