//! Premise and insight detection in free-text answers

use crate::corpus::text::{contains_phrase, sentences, words};

/// Absolutist or assumption-laden wording that flags a premise
const PREMISE_MARKERS: &[&str] = &[
    "always",
    "never",
    "obviously",
    "clearly",
    "of course",
    "by definition",
    "everyone knows",
    "no one",
    "necessarily",
    "inevitably",
    "undeniably",
    "certainly",
    "without exception",
    "must",
];

/// Phrases that mark an answer sentence as an insight
const INSIGHT_MARKERS: &[&str] = &[
    "i realize",
    "i realized",
    "i see now",
    "i now see",
    "discovered",
    "connection",
    "connects",
    "relationship",
    "i understand",
    "the key is",
    "ultimately",
    "in the end",
    "differently",
];

/// Insights kept per answer
pub const MAX_INSIGHTS_PER_ANSWER: usize = 3;

/// A sentence flagged by a premise marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPremise {
    /// Lowercased words joined by single spaces; the dedup key
    pub normalized: String,
    /// Sentence as the user wrote it
    pub sentence: String,
    pub marker: String,
}

#[derive(Debug, Clone)]
pub struct PremiseDetector {
    markers: Vec<String>,
}

impl Default for PremiseDetector {
    fn default() -> Self {
        Self {
            markers: PREMISE_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl PremiseDetector {
    /// Default markers plus `[lexicon] extra_premise_markers`
    pub fn with_extra_markers(extra: &[String]) -> Self {
        let mut detector = Self::default();
        for marker in extra {
            let marker = words(marker).join(" ");
            if !marker.is_empty() && !detector.markers.contains(&marker) {
                detector.markers.push(marker);
            }
        }
        detector
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Every marker-bearing sentence, in order of appearance
    pub fn detect(&self, text: &str) -> Vec<DetectedPremise> {
        sentences(text)
            .into_iter()
            .filter_map(|sentence| {
                let tokens = words(sentence);
                let marker = self.markers.iter().find(|m| contains_phrase(&tokens, m))?;
                Some(DetectedPremise {
                    normalized: normalize_premise(sentence),
                    sentence: sentence.to_string(),
                    marker: marker.clone(),
                })
            })
            .collect()
    }
}

/// Normalized form used for premise deduplication
pub fn normalize_premise(text: &str) -> String {
    words(text).join(" ")
}

/// Up to `MAX_INSIGHTS_PER_ANSWER` insight sentences from an answer
pub fn extract_insights(answer: &str) -> Vec<String> {
    sentences(answer)
        .into_iter()
        .filter(|sentence| {
            let tokens = words(sentence);
            INSIGHT_MARKERS.iter().any(|m| contains_phrase(&tokens, m))
        })
        .map(|s| s.to_string())
        .take(MAX_INSIGHTS_PER_ANSWER)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_always() {
        let detector = PremiseDetector::default();
        let found = detector.detect("I think so. Markets always find equilibrium!");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].normalized, "markets always find equilibrium");
        assert_eq!(found[0].marker, "always");
    }

    #[test]
    fn test_multi_word_marker() {
        let detector = PremiseDetector::default();
        let found = detector.detect("A closed system is by definition isolated.");
        assert_eq!(found[0].marker, "by definition");
        assert!(detector.detect("Define the system first.").is_empty());
    }

    #[test]
    fn test_normalization_ignores_case_and_punctuation() {
        assert_eq!(
            normalize_premise("Markets ALWAYS  find equilibrium."),
            normalize_premise("markets always find equilibrium")
        );
    }

    #[test]
    fn test_extra_markers() {
        let detector = PremiseDetector::with_extra_markers(&["Self-Evidently".to_string()]);
        assert_eq!(detector.detect("It is self-evidently true.").len(), 1);
    }

    #[test]
    fn test_insights_capped() {
        let answer = "I realize it loops. The key is delay. Ultimately it balances. \
                      In the end order wins. Nothing else.";
        let insights = extract_insights(answer);
        assert_eq!(insights.len(), MAX_INSIGHTS_PER_ANSWER);
        assert_eq!(insights[0], "I realize it loops");
    }
}
