use tracing::{debug, warn};

use crate::entity::Entity;
use crate::lexicon::{EntityCategory, Lexicon};
use crate::segmenter::{EntityRecognizer, EntitySpan, Sentence};

/// Lexicon-driven entity extraction over segmented sentences
pub struct EntityExtractor<'a> {
    lexicon: &'a Lexicon,
    recognizer: Option<&'a dyn EntityRecognizer>,
}

impl<'a> EntityExtractor<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            recognizer: None,
        }
    }

    /// Merge spans from an upstream recognizer into the lexicon matches
    pub fn with_recognizer(mut self, recognizer: Option<&'a dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// One entity per (sentence, matching term), in sentence order then
    /// lexicon order. Repeated mentions are kept.
    pub fn extract(&self, transcript: &str, sentences: &[Sentence]) -> Vec<Entity> {
        let spans = self.recognized_spans(transcript);
        let mut entities = Vec::new();

        for sentence in sentences {
            let lowered = sentence.lowered();
            let first_in_sentence = entities.len();

            for set in self.lexicon.entities() {
                for term in set.matches_in(&lowered) {
                    entities.push(Entity::new(set.key(), term, sentence.clone()));
                }
            }

            for span in spans.iter().filter(|span| sentence.contains_offset(span.start)) {
                let Some(category) = EntityCategory::from_label(&span.label) else {
                    continue;
                };
                let Some(term) = transcript.get(span.start..span.end).map(|t| t.trim().to_lowercase()) else {
                    continue;
                };
                let already_matched = entities
                    .get(first_in_sentence..)
                    .is_some_and(|found| found.iter().any(|entity| entity.term == term));
                if term.is_empty() || already_matched {
                    continue;
                }
                entities.push(Entity::new(category, term, sentence.clone()));
            }
        }

        debug!(sentences = sentences.len(), entities = entities.len(), "Entity extraction complete");
        entities
    }

    fn recognized_spans(&self, transcript: &str) -> Vec<EntitySpan> {
        let Some(recognizer) = self.recognizer else {
            return Vec::new();
        };
        match recognizer.extract_entities(transcript) {
            Ok(mut spans) => {
                spans.sort_by_key(|span| span.start);
                spans
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "Entity recognizer unavailable, using lexicon matches only");
                Vec::new()
            }
        }
    }
}
