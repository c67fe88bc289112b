use serde::{Deserialize, Serialize};

use crate::lexicon::{Lexicon, RiskCategory, SeverityLevel};
use crate::segmenter::Sentence;

const DETAIL_CHARS_BEFORE: usize = 30;
const DETAIL_CHARS_AFTER: usize = 50;

/// A risk cue found in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: RiskCategory,
    /// Text window around the matched keyword
    pub detail: String,
    /// Full sentence the keyword was found in
    pub context: String,
    pub severity: SeverityLevel,
}

/// Emit one risk factor per (sentence, category, keyword) match.
///
/// A risk without a stated severity defaults to `moderate`, unlike entities
/// whose severity stays unspecified.
pub fn identify_risk_factors(lexicon: &Lexicon, sentences: &[Sentence]) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    for sentence in sentences {
        let lowered = sentence.lowered();
        let severity = lexicon.severity_in(&lowered).unwrap_or(SeverityLevel::Moderate);

        for set in lexicon.risk() {
            for keyword in set.matches_in(&lowered) {
                factors.push(RiskFactor {
                    category: set.key(),
                    detail: detail_window(&lowered, keyword),
                    context: sentence.text.clone(),
                    severity,
                });
            }
        }
    }

    factors
}

/// Up to 30 characters before and 50 after the first occurrence of `keyword`
fn detail_window(lowered: &str, keyword: &str) -> String {
    let Some(position) = lowered.find(keyword) else {
        return "unspecified".to_string();
    };
    let start = lowered
        .get(..position)
        .and_then(|before| before.char_indices().rev().nth(DETAIL_CHARS_BEFORE - 1))
        .map_or(0, |(idx, _)| idx);
    let end = lowered
        .get(position..)
        .and_then(|after| after.char_indices().nth(DETAIL_CHARS_AFTER))
        .map_or(lowered.len(), |(idx, _)| position + idx);
    lowered.get(start..end).unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::BuiltinSegmenter;

    fn identify(text: &str) -> Vec<RiskFactor> {
        let lexicon = Lexicon::standard();
        identify_risk_factors(&lexicon, &BuiltinSegmenter::split(text))
    }

    #[test]
    fn test_no_risk_keywords() {
        assert!(identify("Patient has a headache.").is_empty());
        assert!(identify("").is_empty());
    }

    #[test]
    fn test_default_severity_is_moderate() {
        let factors = identify("She drinks alcohol daily.");
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].category, RiskCategory::Lifestyle);
        assert_eq!(factors[0].severity, SeverityLevel::Moderate);
        assert_eq!(factors[0].context, "She drinks alcohol daily");
    }

    #[test]
    fn test_severity_from_sentence() {
        let factors = identify("Heavy smoking with extreme stress at the workplace.");
        let categories: Vec<_> = factors.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![RiskCategory::Lifestyle, RiskCategory::Lifestyle, RiskCategory::Environmental]
        );
        assert!(factors.iter().all(|f| f.severity == SeverityLevel::Severe));
    }

    #[test]
    fn test_sentence_major_ordering() {
        let factors = identify("Family history of diabetes. Smoker with pollution exposure.");
        let pairs: Vec<_> = factors.iter().map(|f| (f.category, f.context.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (RiskCategory::FamilyHistory, "Family history of diabetes"),
                (RiskCategory::MedicalHistory, "Family history of diabetes"),
                (RiskCategory::Environmental, "Smoker with pollution exposure"),
                (RiskCategory::Environmental, "Smoker with pollution exposure"),
            ]
        );
    }

    #[test]
    fn test_detail_window_bounds() {
        let sentence = "a".repeat(40) + " smoking " + &"b".repeat(60);
        let detail = detail_window(&sentence, "smoking");
        assert!(detail.starts_with(&"a".repeat(29)));
        assert!(detail.contains("smoking"));
        assert_eq!(detail.chars().count(), 80);
    }

    #[test]
    fn test_detail_window_short_sentence() {
        assert_eq!(detail_window("quit smoking", "smoking"), "quit smoking");
    }

    #[test]
    fn test_detail_window_multibyte() {
        let detail = detail_window("état de stress élevé", "stress");
        assert_eq!(detail, "état de stress élevé");
    }
}
