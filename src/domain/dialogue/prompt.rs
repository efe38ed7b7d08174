//! Prompt composer - renders the next request to the dialogue service.

use super::DialogueTurn;
use crate::domain::anxiety::AnxietyLevel;
use crate::domain::foundation::AnxietyScore;
use crate::domain::patient::{PatientProfile, Personality};

/// Number of prior turns rendered into each prompt by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

const FRAMING: &str = "You are playing a patient attending a first consultation in a doctor's office. \
You have no medical training and do not understand medical terminology. \
Stay in character for the whole conversation.";

const EXTROVERT_DIRECTIVES: &[&str] = &[
    "Manner: proactive, direct and talkative.",
    "Information: volunteer details the doctor has not asked about.",
    "Attitude: trusting and cooperative with the doctor.",
];

const INTROVERT_DIRECTIVES: &[&str] = &[
    "Manner: brief, hesitant and passive.",
    "Information: answer only direct questions, and keep answers short.",
    "Attitude: afraid of hospitals and guarded towards the doctor.",
];

const OUTPUT_SCHEMA: &str = r#"{
  "response_text": "<what you say to the doctor>",
  "anxiety_delta": <number, e.g. -0.15>,
  "anxiety_level": "<none|mild|significant|extreme>",
  "understands": <true|false>
}"#;

/// Deterministic renderer of dialogue-service prompts.
///
/// The same inputs always produce the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptComposer {
    history_window: usize,
}

impl PromptComposer {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Renders the prompt for `utterance`.
    ///
    /// `history` is the session's full turn history; only the last
    /// `history_window` turns are rendered.
    pub fn compose(
        &self,
        profile: &PatientProfile,
        anxiety: AnxietyScore,
        history: &[DialogueTurn],
        utterance: &str,
    ) -> String {
        let level = AnxietyLevel::from_score(anxiety);
        let bounds = profile.response_length();
        let mut sections = Vec::with_capacity(6);

        sections.push(format!("# Role\n{}\n", FRAMING));

        sections.push(format!(
            "## Patient profile\n\
             Symptoms: {}\n\
             Personality: {}\n\
             Current anxiety: {} ({:.2})\n\
             Response length: between {} and {} characters\n",
            profile.symptoms(),
            profile.personality(),
            level,
            anxiety.value(),
            bounds.min(),
            bounds.max()
        ));

        let directives = match profile.personality() {
            Personality::Extrovert => EXTROVERT_DIRECTIVES,
            Personality::Introvert => INTROVERT_DIRECTIVES,
        };
        let mut behaviour = format!("## Behaviour\nYou are an {} patient:\n", profile.personality());
        for directive in directives {
            behaviour.push_str(&format!("- {}\n", directive));
        }
        sections.push(behaviour);

        let start = history.len().saturating_sub(self.history_window);
        let recent = &history[start..];
        if !recent.is_empty() {
            let mut conversation = String::from("## Recent conversation\n");
            for turn in recent {
                conversation.push_str(&format!(
                    "Doctor: {}\nPatient: {}\n",
                    turn.interviewer_text, turn.patient_text
                ));
            }
            sections.push(conversation);
        }

        sections.push(format!("## The doctor now says\n{}\n", utterance));

        sections.push(format!(
            "## Output format\n\
             Reply with a single JSON object containing exactly these fields and nothing else:\n\
             {}\n",
            OUTPUT_SCHEMA
        ));

        // Sections are separated by one blank line.
        sections.join("\n")
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::turn::fixtures::turn;
    use crate::domain::patient::fixtures;

    fn history(count: u32) -> Vec<DialogueTurn> {
        (1..=count).map(|i| turn(i, 0.5, 0.5)).collect()
    }

    #[test]
    fn sections_appear_in_order() {
        let profile = fixtures::profile("extrovert", 0.5);
        let prompt = PromptComposer::default().compose(
            &profile,
            AnxietyScore::new(0.65),
            &history(1),
            "Where does it hurt?",
        );

        let markers = [
            "# Role",
            "Symptoms: Sharp pain",
            "Personality: extrovert",
            "Current anxiety: significant (0.65)",
            "Response length: between 10 and 80 characters",
            "You are an extrovert patient:",
            "## Recent conversation",
            "## The doctor now says\nWhere does it hurt?",
            "## Output format",
            "\"understands\"",
        ];
        let mut cursor = 0;
        for marker in markers {
            let found = prompt[cursor..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing or out of order: {}", marker));
            cursor += found + marker.len();
        }
    }

    #[test]
    fn sections_are_separated_by_single_blank_lines() {
        let profile = fixtures::profile("introvert", 0.2);
        let prompt =
            PromptComposer::default().compose(&profile, AnxietyScore::new(0.2), &history(1), "Hi");

        assert!(prompt.starts_with(&format!("# Role\n{}\n\n## Patient profile\n", FRAMING)));
        assert!(prompt.contains(
            "Response length: between 10 and 80 characters\n\n## Behaviour\nYou are an introvert patient:\n- "
        ));
        assert!(prompt.contains(
            "\n\n## Recent conversation\nDoctor: Question 1\nPatient: Answer 1\n\n## The doctor now says\nHi\n\n## Output format\n"
        ));
        assert!(prompt.ends_with(&format!("nothing else:\n{}\n", OUTPUT_SCHEMA)));
        assert!(!prompt.contains("\n\n\n"));
    }

    #[test]
    fn renders_only_last_three_turns() {
        let profile = fixtures::profile("introvert", 0.2);
        let prompt =
            PromptComposer::default().compose(&profile, AnxietyScore::new(0.2), &history(5), "Hi");

        assert!(!prompt.contains("Question 2"));
        assert!(prompt.contains("Doctor: Question 3\nPatient: Answer 3\nDoctor: Question 4"));
        assert!(prompt.contains("Question 5"));
    }

    #[test]
    fn empty_history_omits_conversation_section() {
        let profile = fixtures::profile("introvert", 0.2);
        let prompt = PromptComposer::default().compose(&profile, AnxietyScore::new(0.2), &[], "Hi");
        assert!(!prompt.contains("## Recent conversation"));
    }

    #[test]
    fn directives_follow_personality() {
        let composer = PromptComposer::default();
        let extrovert = composer.compose(&fixtures::profile("extrovert", 0.2), AnxietyScore::new(0.2), &[], "Hi");
        let introvert = composer.compose(&fixtures::profile("introvert", 0.2), AnxietyScore::new(0.2), &[], "Hi");

        assert!(extrovert.contains("talkative"));
        assert!(!extrovert.contains("hesitant"));
        assert!(introvert.contains("hesitant"));
        assert!(introvert.contains("guarded"));
    }

    #[test]
    fn composition_is_deterministic() {
        let profile = fixtures::profile("extrovert", 0.4);
        let composer = PromptComposer::new(2);
        let turns = history(4);
        let first = composer.compose(&profile, AnxietyScore::new(0.4), &turns, "Any allergies?");
        let second = composer.compose(&profile, AnxietyScore::new(0.4), &turns, "Any allergies?");
        assert_eq!(first, second);
        assert!(!first.contains("Question 2"));
    }
}
