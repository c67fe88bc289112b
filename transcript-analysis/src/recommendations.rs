use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::lexicon::{EntityCategory, SeverityLevel, UrgencyLevel};

/// When the patient should next be seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowUp {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "within 1 week")]
    WithinOneWeek,
    #[serde(rename = "as needed")]
    AsNeeded,
}

impl FollowUp {
    pub fn for_severity(overall: SeverityLevel) -> Self {
        match overall {
            SeverityLevel::Severe => FollowUp::Immediate,
            SeverityLevel::Moderate => FollowUp::WithinOneWeek,
            SeverityLevel::Mild => FollowUp::AsNeeded,
        }
    }
}

/// Suggested handling for one symptom mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub symptom: Entity,
    pub recommendations: Vec<String>,
    pub precautions: Vec<String>,
    pub follow_up: FollowUp,
}

/// Precautions implied anywhere in the transcript
pub fn transcript_precautions(transcript: &str) -> Vec<String> {
    let lowered = transcript.to_lowercase();
    let mut precautions = Vec::new();
    if lowered.contains("allergy") {
        precautions.push("Check for medication allergies".to_string());
    }
    if lowered.contains("diabetes") {
        precautions.push("Monitor blood sugar levels".to_string());
    }
    precautions
}

pub fn recommend(symptom: &Entity, overall: SeverityLevel, urgency: UrgencyLevel) -> Vec<String> {
    let mut recommendations = Vec::new();

    if urgency == UrgencyLevel::Emergency {
        recommendations.push(UrgencyLevel::Emergency.recommendation().to_string());
    }

    match overall {
        SeverityLevel::Severe => {
            recommendations.push("Immediate medical evaluation recommended".to_string());
        }
        SeverityLevel::Moderate => {
            recommendations.push("Schedule follow-up appointment".to_string());
            recommendations.push("Monitor symptoms for changes".to_string());
        }
        SeverityLevel::Mild => {
            recommendations.push("Self-monitor and report if symptoms worsen".to_string());
        }
    }

    if symptom.severity == Some(SeverityLevel::Severe) && overall != SeverityLevel::Severe {
        recommendations.push(format!("Reassess {}: reported as severe", symptom.term));
    }

    recommendations
}

/// One treatment per symptom entity, in entity order
pub fn suggest_treatments(
    entities: &[Entity],
    overall: SeverityLevel,
    urgency: UrgencyLevel,
    precautions: &[String],
) -> Vec<Treatment> {
    entities
        .iter()
        .filter(|entity| entity.category == EntityCategory::Symptom)
        .map(|symptom| Treatment {
            symptom: symptom.clone(),
            recommendations: recommend(symptom, overall, urgency),
            precautions: precautions.to_vec(),
            follow_up: FollowUp::for_severity(overall),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AttributeUpdate;
    use crate::segmenter::Sentence;

    fn entity(category: EntityCategory, term: &str, severity: Option<SeverityLevel>) -> Entity {
        let sentence = Sentence {
            index: 0,
            text: term.to_string(),
            start: 0,
            end: term.len(),
        };
        let mut entity = Entity::new(category, term, sentence);
        entity.apply(AttributeUpdate::Severity(severity));
        entity
    }

    #[test]
    fn test_follow_up_buckets() {
        assert_eq!(FollowUp::for_severity(SeverityLevel::Severe), FollowUp::Immediate);
        assert_eq!(FollowUp::for_severity(SeverityLevel::Moderate), FollowUp::WithinOneWeek);
        assert_eq!(FollowUp::for_severity(SeverityLevel::Mild), FollowUp::AsNeeded);
        assert_eq!(
            serde_json::to_string(&FollowUp::WithinOneWeek).unwrap(),
            r#""within 1 week""#
        );
    }

    #[test]
    fn test_recommendations_by_overall_severity() {
        let cough = entity(EntityCategory::Symptom, "cough", None);
        assert_eq!(
            recommend(&cough, SeverityLevel::Moderate, UrgencyLevel::Routine),
            vec!["Schedule follow-up appointment", "Monitor symptoms for changes"]
        );
        assert_eq!(
            recommend(&cough, SeverityLevel::Mild, UrgencyLevel::Routine),
            vec!["Self-monitor and report if symptoms worsen"]
        );
    }

    #[test]
    fn test_emergency_urgency_leads() {
        let pain = entity(EntityCategory::Symptom, "pain", Some(SeverityLevel::Severe));
        assert_eq!(
            recommend(&pain, SeverityLevel::Severe, UrgencyLevel::Emergency),
            vec![
                "Immediate emergency care recommended",
                "Immediate medical evaluation recommended"
            ]
        );
    }

    #[test]
    fn test_severe_symptom_under_milder_aggregate() {
        let pain = entity(EntityCategory::Symptom, "pain", Some(SeverityLevel::Severe));
        let recommendations = recommend(&pain, SeverityLevel::Mild, UrgencyLevel::Routine);
        assert_eq!(recommendations.last().map(String::as_str), Some("Reassess pain: reported as severe"));
    }

    #[test]
    fn test_precautions() {
        assert_eq!(
            transcript_precautions("History of DIABETES, no known allergy"),
            vec!["Check for medication allergies", "Monitor blood sugar levels"]
        );
        assert!(transcript_precautions("cough").is_empty());
    }

    #[test]
    fn test_only_symptoms_get_treatments() {
        let entities = vec![
            entity(EntityCategory::Symptom, "headache", None),
            entity(EntityCategory::Medication, "ibuprofen", None),
            entity(EntityCategory::Symptom, "nausea", None),
        ];
        let precautions = vec!["Monitor blood sugar levels".to_string()];
        let treatments = suggest_treatments(&entities, SeverityLevel::Severe, UrgencyLevel::Routine, &precautions);
        let terms: Vec<_> = treatments.iter().map(|t| t.symptom.term.as_str()).collect();
        assert_eq!(terms, vec!["headache", "nausea"]);
        assert!(treatments.iter().all(|t| t.follow_up == FollowUp::Immediate));
        assert!(treatments.iter().all(|t| t.precautions == precautions));
    }
}
