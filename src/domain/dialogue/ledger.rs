//! Dialogue ledger - append-only turn history for one session.

use serde::Serialize;

use super::DialogueTurn;
use crate::domain::patient::PatientProfile;
use crate::domain::session::SessionError;

/// Append-only, turn-ordered history.
///
/// Turn indices are contiguous from 1, so `len()` always equals the
/// anxiety state's turn count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DialogueLedger {
    turns: Vec<DialogueTurn>,
}

impl DialogueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    ///
    /// # Errors
    ///
    /// `TurnOutOfSequence` unless `turn.turn_index` is exactly `len() + 1`.
    pub fn append(&mut self, turn: DialogueTurn) -> Result<(), SessionError> {
        let expected = self.next_index();
        if turn.turn_index != expected {
            return Err(SessionError::TurnOutOfSequence {
                expected,
                actual: turn.turn_index,
            });
        }
        self.turns.push(turn);
        Ok(())
    }

    /// The last `n` turns, oldest first. Fewer if the history is shorter.
    pub fn tail(&self, n: usize) -> &[DialogueTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&DialogueTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn next_index(&self) -> u32 {
        self.turns.len() as u32 + 1
    }

    /// Renders the full history as a plain-text transcript.
    ///
    /// Anxiety values use shortest round-trip formatting, so parsing them
    /// back yields exactly the recorded values.
    pub fn export(&self, profile: &PatientProfile) -> String {
        let mut out = format!(
            "Case: {} ({})\nPersonality: {}\nInitial Anxiety: {}\n=== Dialogue Transcript ===\n",
            profile.case_name(),
            profile.case_id(),
            profile.personality(),
            profile.initial_anxiety().value()
        );

        for turn in &self.turns {
            out.push_str(&format!(
                "\n[Turn {}]\nInterviewer: {}\nPatient: {}\nAnxiety: {} -> {} (understood: {})\n",
                turn.turn_index,
                turn.interviewer_text,
                turn.patient_text,
                turn.anxiety_before.value(),
                turn.anxiety_after.value(),
                turn.understood
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::turn::fixtures::turn;
    use crate::domain::patient::fixtures;

    fn ledger_with(count: u32) -> DialogueLedger {
        let mut ledger = DialogueLedger::new();
        let mut anxiety = 0.5;
        for i in 1..=count {
            let next = anxiety + 0.01 * i as f64;
            ledger.append(turn(i, anxiety, next)).unwrap();
            anxiety = next;
        }
        ledger
    }

    #[test]
    fn append_requires_next_index() {
        let mut ledger = ledger_with(2);
        let err = ledger.append(turn(4, 0.5, 0.6)).unwrap_err();
        assert_eq!(err, SessionError::TurnOutOfSequence { expected: 3, actual: 4 });
        assert_eq!(ledger.len(), 2);
        assert!(ledger.append(turn(3, 0.5, 0.6)).is_ok());
    }

    #[test]
    fn tail_returns_most_recent_turns_in_order() {
        let ledger = ledger_with(5);
        let indices: Vec<u32> = ledger.tail(3).iter().map(|t| t.turn_index).collect();
        assert_eq!(indices, vec![3, 4, 5]);
        assert_eq!(ledger.tail(10).len(), 5);
        assert!(DialogueLedger::new().tail(3).is_empty());
    }

    #[test]
    fn export_lists_profile_and_turns() {
        let profile = fixtures::profile("introvert", 0.5);
        let mut ledger = DialogueLedger::new();
        ledger.append(turn(1, 0.5, 0.6)).unwrap();

        let transcript = ledger.export(&profile);
        assert!(transcript.starts_with("Case: Acute abdominal pain (abd-001)\n"));
        assert!(transcript.contains("Personality: introvert\n"));
        assert!(transcript.contains("Initial Anxiety: 0.5\n"));
        assert!(transcript.contains("[Turn 1]\nInterviewer: Question 1\nPatient: Answer 1\n"));
        assert!(transcript.contains("(understood: true)"));
    }

    #[test]
    fn export_layout_is_exact() {
        let profile = fixtures::profile("introvert", 0.5);
        let mut ledger = DialogueLedger::new();
        ledger.append(turn(1, 0.5, 0.6)).unwrap();
        ledger.append(turn(2, 0.6, 0.7)).unwrap();

        let expected = "Case: Acute abdominal pain (abd-001)\n\
                        Personality: introvert\n\
                        Initial Anxiety: 0.5\n\
                        === Dialogue Transcript ===\n\
                        \n\
                        [Turn 1]\n\
                        Interviewer: Question 1\n\
                        Patient: Answer 1\n\
                        Anxiety: 0.5 -> 0.6 (understood: true)\n\
                        \n\
                        [Turn 2]\n\
                        Interviewer: Question 2\n\
                        Patient: Answer 2\n\
                        Anxiety: 0.6 -> 0.7 (understood: true)\n";
        assert_eq!(ledger.export(&profile), expected);
    }

    #[test]
    fn export_without_turns_is_just_the_header() {
        let profile = fixtures::profile("extrovert", 0.25);
        assert_eq!(
            DialogueLedger::new().export(&profile),
            "Case: Acute abdominal pain (abd-001)\nPersonality: extrovert\n\
             Initial Anxiety: 0.25\n=== Dialogue Transcript ===\n"
        );
    }

    #[test]
    fn exported_anxiety_values_round_trip_exactly() {
        let profile = fixtures::profile("extrovert", 0.5);
        let ledger = ledger_with(6);
        let transcript = ledger.export(&profile);

        let parsed: Vec<(f64, f64)> = transcript
            .lines()
            .filter_map(|line| line.strip_prefix("Anxiety: "))
            .map(|rest| {
                let values = rest.split(" (").next().unwrap();
                let (before, after) = values.split_once(" -> ").unwrap();
                (before.parse().unwrap(), after.parse().unwrap())
            })
            .collect();

        let recorded: Vec<(f64, f64)> = ledger
            .turns()
            .iter()
            .map(|t| (t.anxiety_before.value(), t.anxiety_after.value()))
            .collect();
        assert_eq!(parsed, recorded);
    }
}
