//! Symptom-mention tracking.
//!
//! When the interviewer asks about symptoms, the patient's answer is kept as
//! a mention so a reviewer can see which turns elicited the complaint.

use serde::{Deserialize, Serialize};

const DEFAULT_CUES: &[&str] = &[
    "symptom",
    "what brings you",
    "where does it hurt",
    "what's bothering you",
    "what is bothering you",
    "how do you feel",
    "how are you feeling",
    "any pain",
];

/// Patient answer given to a symptom question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMention {
    pub turn_index: u32,
    pub patient_text: String,
}

/// Case-insensitive phrases that mark an utterance as a symptom question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomCues {
    phrases: Vec<String>,
}

impl SymptomCues {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_symptom_question(&self, utterance: &str) -> bool {
        let lowered = utterance.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }
}

impl Default for SymptomCues {
    fn default() -> Self {
        Self::new(DEFAULT_CUES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_default_cues_case_insensitively() {
        let cues = SymptomCues::default();
        assert!(cues.is_symptom_question("So, WHERE DOES IT HURT?"));
        assert!(cues.is_symptom_question("Can you describe your symptoms?"));
        assert!(!cues.is_symptom_question("Please take a seat."));
    }

    #[test]
    fn custom_cues_replace_defaults_and_skip_blanks() {
        let cues = SymptomCues::new(["  Dizzy ", ""]);
        assert_eq!(cues.phrases(), ["dizzy".to_string()]);
        assert!(cues.is_symptom_question("Do you feel dizzy?"));
        assert!(!cues.is_symptom_question("Any symptoms?"));
    }
}
