//! Keyword lexicon - word lists and weights for lexical anxiety signals.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConfigurationError, ValidationError};

const DOCUMENT: &str = "lexicon";

const DEFAULT_POSITIVE_WORDS: &[&str] = &[
    "good", "great", "easy", "relaxed", "yes", "clear", "reassuring", "fine", "better", "hope",
    "curable", "simple", "normal", "healthy", "recover", "improve",
];

const DEFAULT_NEGATIVE_WORDS: &[&str] = &[
    "bad", "hard", "serious", "no", "die", "death", "terrible", "difficult", "wrong", "pain",
    "painful", "cancer", "tumor", "surgery", "chronic", "incurable", "severe", "emergency",
    "critical", "failure", "risk",
];

const DEFAULT_INTENSIFIERS: &[&str] = &[
    "very", "extremely", "absolutely", "terribly", "really", "so", "too", "completely", "totally",
];

const DEFAULT_SOFTENERS: &[&str] = &[
    "maybe", "possibly", "perhaps", "a little", "slightly", "somewhat", "kind of", "a bit",
    "relatively",
];

/// Lexicon document as authored on disk.
///
/// Omitted fields take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconDocument {
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub intensifiers: Vec<String>,
    pub softeners: Vec<String>,
    pub positive_weight: f64,
    pub negative_weight: f64,
    pub intensifier_multiplier: f64,
    pub softener_multiplier: f64,
}

impl Default for LexiconDocument {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            positive_words: owned(DEFAULT_POSITIVE_WORDS),
            negative_words: owned(DEFAULT_NEGATIVE_WORDS),
            intensifiers: owned(DEFAULT_INTENSIFIERS),
            softeners: owned(DEFAULT_SOFTENERS),
            positive_weight: -0.1,
            negative_weight: 0.15,
            intensifier_multiplier: 1.5,
            softener_multiplier: 0.5,
        }
    }
}

/// A sentiment word with its precompiled whole-word pattern.
#[derive(Debug, Clone)]
pub(crate) struct WordPattern {
    pub(crate) word: String,
    pattern: Regex,
}

impl WordPattern {
    fn new(word: String, field: &str) -> Result<Self, ValidationError> {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&word)))
            .map_err(|e| ValidationError::invalid_format(field, e.to_string()))?;
        Ok(Self { word, pattern })
    }

    pub(crate) fn is_match(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

/// Immutable, validated keyword lexicon.
///
/// Entries are lowercased and de-duplicated (first occurrence wins) so
/// matching is case-insensitive and each entry counts at most once.
/// Shared read-only across sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct KeywordLexicon {
    pub(crate) positive: Vec<WordPattern>,
    pub(crate) negative: Vec<WordPattern>,
    pub(crate) intensifiers: Vec<String>,
    pub(crate) softeners: Vec<String>,
    positive_weight: f64,
    negative_weight: f64,
    intensifier_multiplier: f64,
    softener_multiplier: f64,
}

impl KeywordLexicon {
    /// Parses and validates a JSON lexicon document.
    pub fn from_json(source: &str) -> Result<Self, ConfigurationError> {
        let document: LexiconDocument = serde_json::from_str(source)
            .map_err(|e| ConfigurationError::parse(DOCUMENT, e.to_string()))?;
        Self::try_from(document)
    }

    /// Parses and validates a YAML lexicon document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigurationError> {
        let document: LexiconDocument = serde_yaml::from_str(source)
            .map_err(|e| ConfigurationError::parse(DOCUMENT, e.to_string()))?;
        Self::try_from(document)
    }

    pub fn positive_weight(&self) -> f64 {
        self.positive_weight
    }

    pub fn negative_weight(&self) -> f64 {
        self.negative_weight
    }

    pub fn intensifier_multiplier(&self) -> f64 {
        self.intensifier_multiplier
    }

    pub fn softener_multiplier(&self) -> f64 {
        self.softener_multiplier
    }

    pub fn positive_words(&self) -> impl Iterator<Item = &str> {
        self.positive.iter().map(|p| p.word.as_str())
    }

    pub fn negative_words(&self) -> impl Iterator<Item = &str> {
        self.negative.iter().map(|p| p.word.as_str())
    }

    pub fn intensifiers(&self) -> &[String] {
        &self.intensifiers
    }

    pub fn softeners(&self) -> &[String] {
        &self.softeners
    }

    fn validate(document: LexiconDocument) -> Result<Self, ValidationError> {
        if !document.positive_weight.is_finite() || document.positive_weight > 0.0 {
            return Err(ValidationError::out_of_range(
                "positive_weight",
                f64::MIN,
                0.0,
                document.positive_weight,
            ));
        }
        if !document.negative_weight.is_finite() || document.negative_weight < 0.0 {
            return Err(ValidationError::out_of_range(
                "negative_weight",
                0.0,
                f64::MAX,
                document.negative_weight,
            ));
        }
        if !document.intensifier_multiplier.is_finite() || document.intensifier_multiplier <= 1.0 {
            return Err(ValidationError::out_of_range(
                "intensifier_multiplier",
                1.0,
                f64::MAX,
                document.intensifier_multiplier,
            ));
        }
        if !(document.softener_multiplier > 0.0 && document.softener_multiplier < 1.0) {
            return Err(ValidationError::out_of_range(
                "softener_multiplier",
                0.0,
                1.0,
                document.softener_multiplier,
            ));
        }

        let positive = normalize(document.positive_words, "positive_words")?
            .into_iter()
            .map(|w| WordPattern::new(w, "positive_words"))
            .collect::<Result<Vec<_>, _>>()?;
        let negative = normalize(document.negative_words, "negative_words")?
            .into_iter()
            .map(|w| WordPattern::new(w, "negative_words"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            positive,
            negative,
            intensifiers: normalize(document.intensifiers, "intensifiers")?,
            softeners: normalize(document.softeners, "softeners")?,
            positive_weight: document.positive_weight,
            negative_weight: document.negative_weight,
            intensifier_multiplier: document.intensifier_multiplier,
            softener_multiplier: document.softener_multiplier,
        })
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::validate(LexiconDocument::default()).expect("built-in lexicon is valid")
    }
}

impl TryFrom<LexiconDocument> for KeywordLexicon {
    type Error = ConfigurationError;

    fn try_from(document: LexiconDocument) -> Result<Self, Self::Error> {
        Self::validate(document).map_err(|e| ConfigurationError::invalid(DOCUMENT, e))
    }
}

/// Lowercases, trims and de-duplicates entries, rejecting blanks.
fn normalize(words: Vec<String>, field: &str) -> Result<Vec<String>, ValidationError> {
    let mut seen = Vec::with_capacity(words.len());
    for word in words {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        if !seen.contains(&word) {
            seen.push(word);
        }
    }
    Ok(seen)
}
