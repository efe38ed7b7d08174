//! Keyword signal analyzer - lexical anxiety delta from the interviewer's words.
//!
//! Sentiment words match on whole words, intensifiers and softeners on plain
//! substring containment. A softener such as "a little" therefore matches
//! inside "a little bit", and "so" matches inside "also". Both rules are kept
//! as-is so lexical deltas stay comparable with previously recorded sessions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::lexicon::KeywordLexicon;

/// Bound on the magnitude of any lexical delta.
pub const LEXICAL_DELTA_BOUND: f64 = 0.3;

/// Outcome of analysing one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Final lexical delta, within [-0.3, 0.3].
    pub lexical_delta: f64,
    /// Positive entries found, in lexicon order.
    pub matched_positive: Vec<String>,
    /// Negative entries found, in lexicon order.
    pub matched_negative: Vec<String>,
    pub matched_intensifiers: Vec<String>,
    pub matched_softeners: Vec<String>,
    /// Score before the intensifier/softener multiplier.
    pub raw_score: f64,
    pub multiplier: f64,
}

impl AnalysisResult {
    /// A result carrying no signal.
    pub fn neutral() -> Self {
        Self {
            lexical_delta: 0.0,
            matched_positive: Vec::new(),
            matched_negative: Vec::new(),
            matched_intensifiers: Vec::new(),
            matched_softeners: Vec::new(),
            raw_score: 0.0,
            multiplier: 1.0,
        }
    }

    /// Returns true if no sentiment word matched.
    pub fn is_neutral(&self) -> bool {
        self.matched_positive.is_empty() && self.matched_negative.is_empty()
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Computes the lexical signal of `text` against `lexicon`.
///
/// Pure: identical inputs always yield identical results.
pub fn analyze(text: &str, lexicon: &KeywordLexicon) -> AnalysisResult {
    if text.trim().is_empty() {
        return AnalysisResult::neutral();
    }

    let lowered = text.to_lowercase();

    let matched_positive: Vec<String> = lexicon
        .positive
        .iter()
        .filter(|p| p.is_match(&lowered))
        .map(|p| p.word.clone())
        .collect();
    let matched_negative: Vec<String> = lexicon
        .negative
        .iter()
        .filter(|p| p.is_match(&lowered))
        .map(|p| p.word.clone())
        .collect();

    let matched_intensifiers: Vec<String> = lexicon
        .intensifiers
        .iter()
        .filter(|w| lowered.contains(w.as_str()))
        .cloned()
        .collect();
    let matched_softeners: Vec<String> = lexicon
        .softeners
        .iter()
        .filter(|w| lowered.contains(w.as_str()))
        .cloned()
        .collect();

    let raw_score = matched_positive.len() as f64 * lexicon.positive_weight()
        + matched_negative.len() as f64 * lexicon.negative_weight();

    let multiplier = lexicon
        .intensifier_multiplier()
        .powi(matched_intensifiers.len() as i32)
        * lexicon
            .softener_multiplier()
            .powi(matched_softeners.len() as i32);

    let lexical_delta = bounded_delta(raw_score, multiplier);

    AnalysisResult {
        lexical_delta,
        matched_positive,
        matched_negative,
        matched_intensifiers,
        matched_softeners,
        raw_score,
        multiplier,
    }
}

/// Scales the raw score, saturating at the bound when the multiplier overflows.
fn bounded_delta(raw_score: f64, multiplier: f64) -> f64 {
    if raw_score == 0.0 {
        return 0.0;
    }
    let scaled = raw_score * multiplier;
    if !scaled.is_finite() {
        return LEXICAL_DELTA_BOUND.copysign(raw_score);
    }
    scaled.clamp(-LEXICAL_DELTA_BOUND, LEXICAL_DELTA_BOUND)
}

/// Analyzer bound to an optional shared lexicon.
///
/// Without a lexicon every utterance analyses as neutral.
#[derive(Debug, Clone, Default)]
pub struct KeywordSignalAnalyzer {
    lexicon: Option<Arc<KeywordLexicon>>,
}

impl KeywordSignalAnalyzer {
    pub fn new(lexicon: Option<Arc<KeywordLexicon>>) -> Self {
        Self { lexicon }
    }

    pub fn with_lexicon(lexicon: Arc<KeywordLexicon>) -> Self {
        Self::new(Some(lexicon))
    }

    pub fn without_lexicon() -> Self {
        Self::new(None)
    }

    pub fn has_lexicon(&self) -> bool {
        self.lexicon.is_some()
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        match &self.lexicon {
            Some(lexicon) => analyze(text, lexicon),
            None => AnalysisResult::neutral(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lexicon::LexiconDocument;
    use proptest::prelude::*;

    fn default_analyzer() -> KeywordSignalAnalyzer {
        KeywordSignalAnalyzer::with_lexicon(Arc::new(KeywordLexicon::default()))
    }

    #[test]
    fn serious_cancer_news_saturates_at_bound() {
        let result = default_analyzer().analyze("This is very serious, I'm afraid it might be cancer");

        assert_eq!(result.matched_negative, vec!["serious", "cancer"]);
        assert!(result.matched_positive.is_empty());
        assert_eq!(result.matched_intensifiers, vec!["very"]);
        assert!(result.matched_softeners.is_empty());
        assert!((result.raw_score - 0.3).abs() < 1e-12);
        assert_eq!(result.multiplier, 1.5);
        assert_eq!(result.lexical_delta, 0.3);
    }

    #[test]
    fn sentiment_words_require_whole_word_match() {
        // "painless" must not match "pain"; "nothing" must not match "no"
        let result = default_analyzer().analyze("The procedure is painless and nothing to worry about");
        assert!(result.matched_negative.is_empty());
    }

    #[test]
    fn repeated_word_counts_once() {
        let result = default_analyzer().analyze("Good, good, very good");
        assert_eq!(result.matched_positive, vec!["good"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = default_analyzer().analyze("HEALTHY and NORMAL results");
        assert_eq!(result.matched_positive, vec!["normal", "healthy"]);
        assert!((result.raw_score - -0.2).abs() < 1e-12);
    }

    #[test]
    fn softener_matches_by_substring() {
        let result = default_analyzer().analyze("There is a little risk, maybe a bit");
        assert_eq!(result.matched_softeners, vec!["maybe", "a little", "a bit"]);
        assert_eq!(result.matched_negative, vec!["risk"]);
        assert!((result.multiplier - 0.125).abs() < 1e-12);
        assert!((result.lexical_delta - 0.01875).abs() < 1e-12);
    }

    #[test]
    fn intensifier_matches_inside_other_words() {
        // "so" is found inside "also"
        let result = default_analyzer().analyze("It is also fine");
        assert_eq!(result.matched_intensifiers, vec!["so"]);
        assert_eq!(result.matched_positive, vec!["fine"]);
        assert!((result.lexical_delta - -0.15).abs() < 1e-12);
    }

    #[test]
    fn reassurance_lowers_anxiety() {
        let result = default_analyzer().analyze("Good news, it is curable and you will recover");
        assert_eq!(result.matched_positive, vec!["good", "curable", "recover"]);
        assert!((result.lexical_delta - -0.3).abs() < 1e-12);
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(default_analyzer().analyze("   "), AnalysisResult::neutral());
    }

    #[test]
    fn missing_lexicon_is_neutral() {
        let analyzer = KeywordSignalAnalyzer::without_lexicon();
        assert!(!analyzer.has_lexicon());
        let result = analyzer.analyze("This is very serious cancer");
        assert_eq!(result.lexical_delta, 0.0);
        assert!(result.is_neutral());
    }

    #[test]
    fn custom_weights_are_respected() {
        let lexicon = KeywordLexicon::try_from(LexiconDocument {
            negative_weight: 0.05,
            ..Default::default()
        })
        .unwrap();
        let result = analyze("bad", &lexicon);
        assert!((result.lexical_delta - 0.05).abs() < 1e-12);
    }

    fn overflowing_lexicon() -> KeywordLexicon {
        KeywordLexicon::try_from(LexiconDocument {
            intensifier_multiplier: 1e200,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn overflowing_multiplier_without_sentiment_is_zero() {
        let result = analyze("it is very very extremely calm", &overflowing_lexicon());
        assert!(result.multiplier.is_infinite());
        assert_eq!(result.raw_score, 0.0);
        assert_eq!(result.lexical_delta, 0.0);
    }

    #[test]
    fn overflowing_multiplier_saturates_by_sign() {
        let lexicon = overflowing_lexicon();
        let worse = analyze("very extremely serious", &lexicon);
        assert_eq!(worse.lexical_delta, LEXICAL_DELTA_BOUND);

        let better = analyze("very extremely good", &lexicon);
        assert_eq!(better.lexical_delta, -LEXICAL_DELTA_BOUND);
    }

    proptest! {
        #[test]
        fn analysis_is_pure_and_bounded(text in "[a-zA-Z ,.']{0,80}") {
            let analyzer = default_analyzer();
            let first = analyzer.analyze(&text);
            let _ = analyzer.analyze("this is very serious");
            let second = analyzer.analyze(&text);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.lexical_delta.abs() <= LEXICAL_DELTA_BOUND);
        }
    }
}
