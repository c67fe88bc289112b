use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, ObservationCategory};
use crate::segmenter::Sentence;

mod patterns {
    // Literal patterns; exercised by the tests below.
    #![allow(clippy::unwrap_used)]

    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref TEMPERATURE: Regex = Regex::new(r"(\d+\.?\d*)\s*°?[CFcf]\b").unwrap();
        pub static ref BLOOD_PRESSURE: Regex = Regex::new(r"(\d+/\d+)").unwrap();
        pub static ref PULSE: Regex = Regex::new(r"(?i)(\d+)\s*bpm").unwrap();
        pub static ref OXYGEN: Regex = Regex::new(r"(\d+)%").unwrap();
    }
}

/// A clinical observation stated in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub category: ObservationCategory,
    pub observation: String,
    pub keyword: String,
    /// First measurement in the sentence, if any
    pub value: Option<String>,
}

pub fn extract_observations(lexicon: &Lexicon, sentences: &[Sentence]) -> Vec<Observation> {
    let mut observations = Vec::new();

    for sentence in sentences {
        let lowered = sentence.lowered();
        let value = extract_measurement(&sentence.text);

        for set in lexicon.observations() {
            for keyword in set.matches_in(&lowered) {
                observations.push(Observation {
                    category: set.key(),
                    observation: sentence.text.clone(),
                    keyword: keyword.to_string(),
                    value: value.clone(),
                });
            }
        }
    }

    observations
}

/// Temperature, then blood pressure, pulse and oxygen saturation
pub fn extract_measurement(text: &str) -> Option<String> {
    [
        &*patterns::TEMPERATURE,
        &*patterns::BLOOD_PRESSURE,
        &*patterns::PULSE,
        &*patterns::OXYGEN,
    ]
    .into_iter()
    .find_map(|pattern| pattern.captures(text)?.get(1).map(|m| m.as_str().to_string()))
}
