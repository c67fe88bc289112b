use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{SeverityAssessment, UrgencyAssessment};
use crate::entity::Entity;
use crate::error::AnalysisResult;
use crate::observations::Observation;
use crate::recommendations::Treatment;
use crate::risk::RiskFactor;

/// Structured summary of one transcript.
///
/// Field order is the wire order: `entities, riskFactors, severity, urgency,
/// treatments, observations, generatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub entities: Vec<Entity>,
    pub risk_factors: Vec<RiskFactor>,
    pub severity: SeverityAssessment,
    pub urgency: UrgencyAssessment,
    pub treatments: Vec<Treatment>,
    pub observations: Vec<Observation>,
    pub generated_at: DateTime<Utc>,
}

/// Outputs of the individual passes, ready to be assembled
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub entities: Vec<Entity>,
    pub risk_factors: Vec<RiskFactor>,
    pub severity: SeverityAssessment,
    pub urgency: UrgencyAssessment,
    pub treatments: Vec<Treatment>,
    pub observations: Vec<Observation>,
}

impl AnalysisReport {
    pub fn assemble(parts: ReportParts, generated_at: DateTime<Utc>) -> Self {
        let ReportParts {
            entities,
            risk_factors,
            severity,
            urgency,
            treatments,
            observations,
        } = parts;
        Self {
            entities,
            risk_factors,
            severity,
            urgency,
            treatments,
            observations,
            generated_at,
        }
    }

    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json_pretty(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Fails when `json` is not a report in the documented shape.
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same report with the timestamp replaced, for comparing reports of identical input
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{AggregateClassifier, ConfidencePolicy};
    use crate::lexicon::Lexicon;

    fn empty_parts() -> ReportParts {
        let lexicon = Lexicon::standard();
        let classifier = AggregateClassifier::new(&lexicon, ConfidencePolicy::default());
        ReportParts {
            entities: Vec::new(),
            risk_factors: Vec::new(),
            severity: classifier.classify_severity(""),
            urgency: classifier.classify_urgency(""),
            treatments: Vec::new(),
            observations: Vec::new(),
        }
    }

    #[test]
    fn test_field_order_on_the_wire() {
        let report = AnalysisReport::assemble(empty_parts(), Utc::now());
        let json = report.to_json().unwrap();
        let keys = [
            "\"entities\"",
            "\"riskFactors\"",
            "\"severity\"",
            "\"urgency\"",
            "\"treatments\"",
            "\"observations\"",
            "\"generatedAt\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{}", json);
    }

    #[test]
    fn test_empty_report_round_trip() {
        let report = AnalysisReport::assemble(empty_parts(), Utc::now());
        let back = AnalysisReport::from_json(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(AnalysisReport::from_json(r#"{"entities": []}"#).is_err());
    }
}
