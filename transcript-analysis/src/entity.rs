use serde::{Deserialize, Serialize};

use crate::lexicon::{EntityCategory, SeverityLevel};
use crate::segmenter::Sentence;

/// Whether a mention refers to something current or past
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Resolved,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationKind {
    Acute,
    Chronic,
    Unspecified,
}

/// Stated duration of a mention, e.g. "3 days" or "2 years"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDuration {
    #[serde(rename = "type")]
    pub kind: DurationKind,
    pub value: Option<u64>,
    pub unit: Option<String>,
}

impl EntityDuration {
    pub fn unspecified() -> Self {
        Self {
            kind: DurationKind::Unspecified,
            value: None,
            unit: None,
        }
    }
}

impl Default for EntityDuration {
    fn default() -> Self {
        Self::unspecified()
    }
}

/// A typed clinical mention found in one sentence of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub category: EntityCategory,
    pub term: String,
    pub source_sentence: Sentence,
    /// Anatomical site, `"unspecified"` on the wire when absent
    #[serde(with = "unspecified")]
    pub location: Option<String>,
    pub duration: EntityDuration,
    #[serde(with = "unspecified")]
    pub severity: Option<SeverityLevel>,
    pub status: EntityStatus,
}

impl Entity {
    pub fn new(category: EntityCategory, term: impl Into<String>, source_sentence: Sentence) -> Self {
        Self {
            category,
            term: term.into(),
            source_sentence,
            location: None,
            duration: EntityDuration::unspecified(),
            severity: None,
            status: EntityStatus::Unknown,
        }
    }

    /// Merge one resolver's output into this entity
    pub fn apply(&mut self, update: AttributeUpdate) {
        match update {
            AttributeUpdate::Location(location) => self.location = location,
            AttributeUpdate::Duration(duration) => self.duration = duration,
            AttributeUpdate::Severity(severity) => self.severity = severity,
            AttributeUpdate::Status(status) => self.status = status,
        }
    }
}

/// Partial update produced by a single attribute resolver
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeUpdate {
    Location(Option<String>),
    Duration(EntityDuration),
    Severity(Option<SeverityLevel>),
    Status(EntityStatus),
}

/// Serde adapter writing `None` as the string `"unspecified"`.
pub(crate) mod unspecified {
    use serde::de::{DeserializeOwned, IntoDeserializer};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const UNSPECIFIED: &str = "unspecified";

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_str(UNSPECIFIED),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw == UNSPECIFIED {
            return Ok(None);
        }
        T::deserialize(raw.into_deserializer()).map(Some)
    }
}
