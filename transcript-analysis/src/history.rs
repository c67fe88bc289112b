use serde::{Deserialize, Serialize};

use crate::attributes::{DurationResolver, StatusResolver};
use crate::entity::{EntityDuration, EntityStatus};
use crate::lexicon::{HistoryCategory, Lexicon};
use crate::segmenter::Sentence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    /// Sentence marks the matter as continuing ("since ...")
    pub ongoing: bool,
    pub duration: EntityDuration,
}

/// A past or current medical history mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub category: HistoryCategory,
    /// First pattern of the category that matched
    pub trigger: String,
    pub description: String,
    pub timeframe: Timeframe,
    pub status: EntityStatus,
}

/// One entry per (sentence, history category) with a matching pattern
pub fn extract_medical_history(lexicon: &Lexicon, sentences: &[Sentence]) -> Vec<MedicalHistoryEntry> {
    let mut history = Vec::new();

    for sentence in sentences {
        let lowered = sentence.lowered();

        for set in lexicon.history() {
            let Some(trigger) = set.matches_in(&lowered).next() else {
                continue;
            };
            history.push(MedicalHistoryEntry {
                category: set.key(),
                trigger: trigger.to_string(),
                description: sentence.text.clone(),
                timeframe: Timeframe {
                    ongoing: lowered.contains("since"),
                    duration: DurationResolver::parse(&sentence.text),
                },
                status: StatusResolver::classify(&lowered),
            });
        }
    }

    history
}
