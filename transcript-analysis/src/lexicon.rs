//! Clinical vocabulary driving every extraction and classification pass
//!
//! The lexicon is a closed set of categories, each holding an ordered list of
//! lower-case terms. Term order is significant: extraction output follows it,
//! and the classifiers walk levels in the fixed check orders declared here.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Category of an extracted clinical mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Symptom,
    Condition,
    Medication,
    Procedure,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Symptom,
        EntityCategory::Condition,
        EntityCategory::Medication,
        EntityCategory::Procedure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityCategory::Symptom => "symptom",
            EntityCategory::Condition => "condition",
            EntityCategory::Medication => "medication",
            EntityCategory::Procedure => "procedure",
        }
    }

    /// Map a coarse NER label (`SYMPTOM`, `CONDITION`, ...) to a category
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| label.trim().eq_ignore_ascii_case(category.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Mild,
    Moderate,
    Severe,
}

impl SeverityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLevel::Mild => "mild",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Emergency,
    Urgent,
    Routine,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Emergency => "emergency",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Routine => "routine",
        }
    }

    /// Fixed guidance attached to every urgency classification
    pub fn recommendation(self) -> &'static str {
        match self {
            UrgencyLevel::Emergency => "Immediate emergency care recommended",
            UrgencyLevel::Urgent => "Prompt medical attention recommended",
            UrgencyLevel::Routine => "Regular follow-up recommended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Lifestyle,
    FamilyHistory,
    MedicalHistory,
    Environmental,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Lifestyle,
        RiskCategory::FamilyHistory,
        RiskCategory::MedicalHistory,
        RiskCategory::Environmental,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationCategory {
    VitalSigns,
    PhysicalExam,
    PatientState,
    TestResults,
}

impl ObservationCategory {
    pub const ALL: [ObservationCategory; 4] = [
        ObservationCategory::VitalSigns,
        ObservationCategory::PhysicalExam,
        ObservationCategory::PatientState,
        ObservationCategory::TestResults,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryCategory {
    Condition,
    Surgery,
    Medication,
    Allergy,
}

impl HistoryCategory {
    pub const ALL: [HistoryCategory; 4] = [
        HistoryCategory::Condition,
        HistoryCategory::Surgery,
        HistoryCategory::Medication,
        HistoryCategory::Allergy,
    ];
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(EntityCategory, SeverityLevel, UrgencyLevel);

/// Severity levels in the order they are tested. The first level with any
/// keyword present wins, both for the whole-transcript classifier and for the
/// per-sentence severity resolvers, regardless of where the keywords occur.
pub const SEVERITY_CHECK_ORDER: [SeverityLevel; 3] =
    [SeverityLevel::Severe, SeverityLevel::Moderate, SeverityLevel::Mild];

/// Urgency levels in the order they are tested; first match wins.
pub const URGENCY_CHECK_ORDER: [UrgencyLevel; 3] =
    [UrgencyLevel::Emergency, UrgencyLevel::Urgent, UrgencyLevel::Routine];

/// Ordered term list for one lexicon category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSet<K> {
    key: K,
    terms: Vec<String>,
}

impl<K: Copy> TermSet<K> {
    pub fn key(&self) -> K {
        self.key
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms occurring in `lowered`, in lexicon order. `lowered` must already be lower-case.
    pub fn matches_in<'a>(&'a self, lowered: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.terms
            .iter()
            .map(String::as_str)
            .filter(move |term| lowered.contains(*term))
    }

    pub fn any_in(&self, lowered: &str) -> bool {
        self.matches_in(lowered).next().is_some()
    }
}

/// Serializable lexicon source, as loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconDefinition {
    #[serde(default)]
    pub entities: BTreeMap<EntityCategory, Vec<String>>,
    #[serde(default)]
    pub anatomy: Vec<String>,
    #[serde(default)]
    pub severity: BTreeMap<SeverityLevel, Vec<String>>,
    #[serde(default)]
    pub urgency: BTreeMap<UrgencyLevel, Vec<String>>,
    #[serde(default)]
    pub risk: BTreeMap<RiskCategory, Vec<String>>,
    #[serde(default)]
    pub observations: BTreeMap<ObservationCategory, Vec<String>>,
    #[serde(default)]
    pub history: BTreeMap<HistoryCategory, Vec<String>>,
}

/// Immutable, validated vocabulary shared by all analysis passes
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    entities: Vec<TermSet<EntityCategory>>,
    anatomy: Vec<String>,
    severity: Vec<TermSet<SeverityLevel>>,
    urgency: Vec<TermSet<UrgencyLevel>>,
    risk: Vec<TermSet<RiskCategory>>,
    observations: Vec<TermSet<ObservationCategory>>,
    history: Vec<TermSet<HistoryCategory>>,
}

lazy_static! {
    static ref STANDARD: Arc<Lexicon> = Arc::new(Lexicon::build(Lexicon::standard_definition()));
}

impl Lexicon {
    /// Built-in vocabulary, constructed once per process
    pub fn standard() -> Arc<Lexicon> {
        Arc::clone(&STANDARD)
    }

    /// Validate a definition and fix its category order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidLexicon`] when a term is empty, not
    /// trimmed, not lower-case, or repeated within its category.
    pub fn from_definition(definition: LexiconDefinition) -> AnalysisResult<Self> {
        for (category, terms) in &definition.entities {
            validate_terms(category.as_str(), terms)?;
        }
        validate_terms("anatomy", &definition.anatomy)?;
        for (level, terms) in &definition.severity {
            validate_terms(level.as_str(), terms)?;
        }
        for (level, terms) in &definition.urgency {
            validate_terms(level.as_str(), terms)?;
        }
        for (category, terms) in &definition.risk {
            validate_terms(&format!("{:?}", category), terms)?;
        }
        for (category, terms) in &definition.observations {
            validate_terms(&format!("{:?}", category), terms)?;
        }
        for (category, terms) in &definition.history {
            validate_terms(&format!("{:?}", category), terms)?;
        }
        Ok(Self::build(definition))
    }

    /// Parse and validate a JSON lexicon definition
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown categories, or invalid terms.
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let definition: LexiconDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Read a JSON lexicon definition from disk
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not hold a valid definition.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn build(mut definition: LexiconDefinition) -> Self {
        fn ordered<K: Copy + Ord>(keys: &[K], map: &mut BTreeMap<K, Vec<String>>) -> Vec<TermSet<K>> {
            keys.iter()
                .map(|&key| TermSet {
                    key,
                    terms: map.remove(&key).unwrap_or_default(),
                })
                .collect()
        }

        Self {
            entities: ordered(&EntityCategory::ALL, &mut definition.entities),
            anatomy: definition.anatomy,
            severity: ordered(&SEVERITY_CHECK_ORDER, &mut definition.severity),
            urgency: ordered(&URGENCY_CHECK_ORDER, &mut definition.urgency),
            risk: ordered(&RiskCategory::ALL, &mut definition.risk),
            observations: ordered(&ObservationCategory::ALL, &mut definition.observations),
            history: ordered(&HistoryCategory::ALL, &mut definition.history),
        }
    }

    /// Symptom, condition, medication and procedure vocabularies, in that order
    pub fn entities(&self) -> &[TermSet<EntityCategory>] {
        &self.entities
    }

    pub fn terms(&self, category: EntityCategory) -> &[String] {
        self.entities
            .iter()
            .find(|set| set.key == category)
            .map_or(&[][..], |set| set.terms.as_slice())
    }

    pub fn anatomy(&self) -> &[String] {
        &self.anatomy
    }

    /// Severity vocabularies in [`SEVERITY_CHECK_ORDER`]
    pub fn severity(&self) -> &[TermSet<SeverityLevel>] {
        &self.severity
    }

    /// Urgency vocabularies in [`URGENCY_CHECK_ORDER`]
    pub fn urgency(&self) -> &[TermSet<UrgencyLevel>] {
        &self.urgency
    }

    pub fn risk(&self) -> &[TermSet<RiskCategory>] {
        &self.risk
    }

    pub fn observations(&self) -> &[TermSet<ObservationCategory>] {
        &self.observations
    }

    pub fn history(&self) -> &[TermSet<HistoryCategory>] {
        &self.history
    }

    /// First severity level in check order with a keyword in `lowered`
    pub fn severity_in(&self, lowered: &str) -> Option<SeverityLevel> {
        self.severity
            .iter()
            .find(|set| set.any_in(lowered))
            .map(TermSet::key)
    }

    /// Round-trip back to the serializable form
    pub fn to_definition(&self) -> LexiconDefinition {
        fn unordered<K: Copy + Ord>(sets: &[TermSet<K>]) -> BTreeMap<K, Vec<String>> {
            sets.iter().map(|set| (set.key, set.terms.clone())).collect()
        }

        LexiconDefinition {
            entities: unordered(&self.entities),
            anatomy: self.anatomy.clone(),
            severity: unordered(&self.severity),
            urgency: unordered(&self.urgency),
            risk: unordered(&self.risk),
            observations: unordered(&self.observations),
            history: unordered(&self.history),
        }
    }

    pub fn standard_definition() -> LexiconDefinition {
        LexiconDefinition {
            entities: BTreeMap::from([
                (
                    EntityCategory::Symptom,
                    terms(&[
                        "pain", "ache", "headache", "nausea", "fever", "dizzy", "dizziness", "fatigue",
                        "cough", "vomiting", "swelling", "discomfort", "numbness", "tingling",
                        "weakness", "stiffness",
                    ]),
                ),
                (
                    EntityCategory::Condition,
                    terms(&[
                        "diabetes", "hypertension", "asthma", "migraine", "arthritis", "infection",
                        "flu", "cold",
                    ]),
                ),
                (
                    EntityCategory::Medication,
                    terms(&[
                        "ibuprofen", "paracetamol", "aspirin", "antibiotic", "medication", "medicine",
                        "tablet", "prescription",
                    ]),
                ),
                (
                    EntityCategory::Procedure,
                    terms(&["surgery", "operation", "scan", "x-ray", "test", "examination", "check-up"]),
                ),
            ]),
            anatomy: terms(&["head", "chest", "back", "arm", "leg", "stomach", "knee", "shoulder"]),
            severity: BTreeMap::from([
                (
                    SeverityLevel::Severe,
                    terms(&["severe", "intense", "extreme", "serious", "grave", "acute", "worst"]),
                ),
                (
                    SeverityLevel::Moderate,
                    terms(&["moderate", "significant", "noticeable", "considerable", "uncomfortable"]),
                ),
                (
                    SeverityLevel::Mild,
                    terms(&["mild", "slight", "minor", "light", "minimal"]),
                ),
            ]),
            urgency: BTreeMap::from([
                (
                    UrgencyLevel::Emergency,
                    terms(&[
                        "emergency", "immediately", "severe pain", "chest pain", "unbearable pain",
                        "heart attack", "stroke", "severe bleeding", "can't breathe", "cannot breathe",
                    ]),
                ),
                (
                    UrgencyLevel::Urgent,
                    terms(&[
                        "urgent", "worrying", "getting worse", "difficulty breathing", "sudden onset",
                        "loss of consciousness",
                    ]),
                ),
                (UrgencyLevel::Routine, terms(&["routine", "chronic", "ongoing"])),
            ]),
            risk: BTreeMap::from([
                (
                    RiskCategory::Lifestyle,
                    terms(&["smoking", "alcohol", "diet", "exercise", "stress"]),
                ),
                (
                    RiskCategory::FamilyHistory,
                    terms(&["family history", "genetic", "hereditary", "parent", "sibling"]),
                ),
                (
                    RiskCategory::MedicalHistory,
                    terms(&["previous", "history of", "chronic", "diagnosed with"]),
                ),
                (
                    RiskCategory::Environmental,
                    terms(&["exposure", "workplace", "environment", "pollution"]),
                ),
            ]),
            observations: BTreeMap::from([
                (
                    ObservationCategory::VitalSigns,
                    terms(&["temperature", "blood pressure", "pulse", "breathing"]),
                ),
                (
                    ObservationCategory::PhysicalExam,
                    terms(&["swelling", "redness", "tenderness", "reflexes"]),
                ),
                (
                    ObservationCategory::PatientState,
                    terms(&["alert", "conscious", "oriented", "distressed"]),
                ),
                (
                    ObservationCategory::TestResults,
                    terms(&["test", "level", "count", "rate"]),
                ),
            ]),
            history: BTreeMap::from([
                (
                    HistoryCategory::Condition,
                    terms(&["diagnosed with", "history of", "suffers from", "had"]),
                ),
                (
                    HistoryCategory::Surgery,
                    terms(&["surgery", "operation", "procedure"]),
                ),
                (
                    HistoryCategory::Medication,
                    terms(&["takes", "taking", "prescribed", "medication"]),
                ),
                (
                    HistoryCategory::Allergy,
                    terms(&["allergic to", "allergy", "reaction"]),
                ),
            ]),
        }
    }
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|term| (*term).to_string()).collect()
}

fn validate_terms(category: &str, terms: &[String]) -> AnalysisResult<()> {
    if let Some(bad) = terms
        .iter()
        .find(|term| term.is_empty() || term.trim() != term.as_str() || term.to_lowercase() != **term)
    {
        return Err(AnalysisError::InvalidLexicon(format!(
            "term '{}' in {} must be non-empty, trimmed and lower-case",
            bad, category
        )));
    }
    if let Some(duplicate) = terms.iter().duplicates().next() {
        return Err(AnalysisError::InvalidLexicon(format!(
            "term '{}' appears more than once in {}",
            duplicate, category
        )));
    }
    Ok(())
}
