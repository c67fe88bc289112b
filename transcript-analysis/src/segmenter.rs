//! Sentence segmentation and the upstream NLP collaborator interfaces.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalysisError, AnalysisResult};

/// One sentence of a transcript, with byte offsets into the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Sentence {
    /// Lower-cased text used for keyword matching
    pub fn lowered(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Candidate entity span reported by an upstream recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    /// Coarse label such as `SYMPTOM` or `MEDICATION`
    pub label: String,
}

/// Splits a transcript into ordered sentences
pub trait SentenceSegmenter: Send + Sync {
    /// # Errors
    ///
    /// Implementations return [`AnalysisError::CollaboratorUnavailable`] when
    /// their backing model or service cannot be used.
    fn segment(&self, text: &str) -> AnalysisResult<Vec<Sentence>>;
}

/// Named-entity recognizer producing labelled spans
pub trait EntityRecognizer: Send + Sync {
    /// # Errors
    ///
    /// Implementations return [`AnalysisError::CollaboratorUnavailable`] when
    /// their backing model or service cannot be used.
    fn extract_entities(&self, text: &str) -> AnalysisResult<Vec<EntitySpan>>;
}

/// Minimal splitter on `.`, `!` and `?`.
///
/// A period between two ASCII digits is a decimal point, not a boundary, so
/// readings like `38.5` stay in one sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSegmenter;

impl BuiltinSegmenter {
    pub fn split(text: &str) -> Vec<Sentence> {
        let bytes = text.as_bytes();
        let mut sentences = Vec::new();
        let mut piece_start = 0;

        for (pos, ch) in text.char_indices() {
            let boundary = match ch {
                '!' | '?' => true,
                '.' => {
                    let digit_before = pos
                        .checked_sub(1)
                        .and_then(|before| bytes.get(before))
                        .is_some_and(u8::is_ascii_digit);
                    let digit_after = bytes.get(pos + 1).is_some_and(u8::is_ascii_digit);
                    !(digit_before && digit_after)
                }
                _ => false,
            };
            if boundary {
                push_trimmed(text, piece_start, pos, &mut sentences);
                piece_start = pos + ch.len_utf8();
            }
        }
        push_trimmed(text, piece_start, text.len(), &mut sentences);

        sentences
    }
}

impl SentenceSegmenter for BuiltinSegmenter {
    fn segment(&self, text: &str) -> AnalysisResult<Vec<Sentence>> {
        Ok(Self::split(text))
    }
}

fn push_trimmed(text: &str, start: usize, end: usize, sentences: &mut Vec<Sentence>) {
    let Some(piece) = text.get(start..end) else {
        return;
    };
    let leading = piece.len() - piece.trim_start().len();
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return;
    }
    let sentence_start = start + leading;
    sentences.push(Sentence {
        index: sentences.len(),
        text: trimmed.to_string(),
        start: sentence_start,
        end: sentence_start + trimmed.len(),
    });
}

/// Run the upstream segmenter if there is one, otherwise or on failure fall
/// back to [`BuiltinSegmenter`]. Returned sentences are always indexed 0..n.
pub fn segment_with_fallback(upstream: Option<&dyn SentenceSegmenter>, text: &str) -> Vec<Sentence> {
    let Some(segmenter) = upstream else {
        return BuiltinSegmenter::split(text);
    };

    let checked = segmenter.segment(text).and_then(|sentences| {
        validate_sentences(text, &sentences)?;
        Ok(sentences)
    });

    match checked {
        Ok(mut sentences) => {
            for (index, sentence) in sentences.iter_mut().enumerate() {
                sentence.index = index;
            }
            sentences
        }
        Err(err) => {
            warn!(error = %err, code = err.code(), "Sentence segmenter unavailable, using built-in splitter");
            BuiltinSegmenter::split(text)
        }
    }
}

fn validate_sentences(text: &str, sentences: &[Sentence]) -> AnalysisResult<()> {
    let mut previous_end = 0;
    for sentence in sentences {
        let in_bounds = sentence.start <= sentence.end
            && sentence.start >= previous_end
            && text.get(sentence.start..sentence.end).is_some();
        if !in_bounds {
            return Err(AnalysisError::CollaboratorUnavailable(format!(
                "segmenter returned invalid span {}..{}",
                sentence.start, sentence.end
            )));
        }
        previous_end = sentence.end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OfflineSegmenter;

    impl SentenceSegmenter for OfflineSegmenter {
        fn segment(&self, _text: &str) -> AnalysisResult<Vec<Sentence>> {
            Err(AnalysisError::CollaboratorUnavailable("model not loaded".into()))
        }
    }

    struct WholeTextSegmenter;

    impl SentenceSegmenter for WholeTextSegmenter {
        fn segment(&self, text: &str) -> AnalysisResult<Vec<Sentence>> {
            Ok(vec![Sentence {
                index: 7,
                text: text.to_string(),
                start: 0,
                end: text.len(),
            }])
        }
    }

    struct OutOfRangeSegmenter;

    impl SentenceSegmenter for OutOfRangeSegmenter {
        fn segment(&self, text: &str) -> AnalysisResult<Vec<Sentence>> {
            Ok(vec![Sentence {
                index: 0,
                text: text.to_string(),
                start: 0,
                end: text.len() + 10,
            }])
        }
    }

    #[test]
    fn test_split_on_terminators() {
        let text = "Headache since Monday. Any nausea? Yes!  ";
        let sentences = BuiltinSegmenter::split(text);
        let texts: Vec<_> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Headache since Monday", "Any nausea", "Yes"]);
        for (i, sentence) in sentences.iter().enumerate() {
            assert_eq!(sentence.index, i);
            assert_eq!(&text[sentence.start..sentence.end], sentence.text);
        }
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        let sentences = BuiltinSegmenter::split("Temperature 38.5C today. Pulse 80.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Temperature 38.5C today");
    }

    #[test]
    fn test_empty_and_punctuation_only_input() {
        assert!(BuiltinSegmenter::split("").is_empty());
        assert!(BuiltinSegmenter::split(" . ! ? ").is_empty());
    }

    #[test]
    fn test_text_without_terminator_is_one_sentence() {
        let sentences = BuiltinSegmenter::split("mild cough");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].start, 0);
        assert_eq!(sentences[0].end, 10);
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let text = "Température élevée. Douleur à la tête!";
        let sentences = BuiltinSegmenter::split(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(&text[sentences[1].start..sentences[1].end], "Douleur à la tête");
    }

    #[test]
    fn test_fallback_when_collaborator_unavailable() {
        let sentences = segment_with_fallback(Some(&OfflineSegmenter), "One. Two.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_fallback_on_invalid_offsets() {
        let sentences = segment_with_fallback(Some(&OutOfRangeSegmenter), "One. Two.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_upstream_sentences_are_reindexed() {
        let sentences = segment_with_fallback(Some(&WholeTextSegmenter), "One. Two.");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].index, 0);
    }
}
