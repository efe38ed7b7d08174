//! Patient session aggregate.
//!
//! A session owns one profile, one anxiety state and one ledger for the
//! lifetime of a dialogue. A turn runs in two phases:
//!
//! 1. [`PatientSession::prepare_turn`] reads the session and produces the
//!    prompt and lexical analysis. Nothing is mutated.
//! 2. [`PatientSession::record_turn`] fuses the service reply and commits the
//!    new anxiety, ledger entry and symptom mention together, or nothing.
//!
//! Anything that happens between the two phases (a failed or cancelled
//! service call) therefore leaves the session untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DynamicsEngine, SessionError};
use crate::domain::anxiety::{
    AnxietyLevel, AnxietyState, AnxietyTransition, FusionBreakdown, FusionInputs,
};
use crate::domain::dialogue::{DialogueLedger, DialogueTurn, PatientResponse, SymptomMention};
use crate::domain::foundation::{AnxietyScore, SessionId, Timestamp};
use crate::domain::lexicon::AnalysisResult;
use crate::domain::patient::PatientProfile;

/// Read-only values an animation or UI layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentationSignal {
    pub anxiety: f64,
    pub level: AnxietyLevel,
    pub turn_count: u32,
    pub animation_intensity: f64,
}

impl PresentationSignal {
    fn from_state(anxiety: AnxietyScore, turn_count: u32) -> Self {
        let level = AnxietyLevel::from_score(anxiety);
        Self {
            anxiety: anxiety.value(),
            level,
            turn_count,
            animation_intensity: level.animation_intensity(),
        }
    }
}

/// Patient reply length outside the profile's bounds. Reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLengthWarning {
    pub length: usize,
    pub min: u32,
    pub max: u32,
}

impl fmt::Display for ResponseLengthWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "response length {} outside bounds [{}, {}]",
            self.length, self.min, self.max
        )
    }
}

/// Snapshot taken before the dialogue-service round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTurn {
    pub turn_index: u32,
    pub utterance: String,
    pub prompt: String,
    pub analysis: AnalysisResult,
    pub anxiety_before: AnxietyScore,
}

/// Everything produced by one committed turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub turn: DialogueTurn,
    pub transition: AnxietyTransition,
    pub analysis: AnalysisResult,
    pub fusion: FusionBreakdown,
    pub length_warning: Option<ResponseLengthWarning>,
    pub symptom_mention: bool,
    pub presentation: PresentationSignal,
}

impl TurnOutcome {
    /// True when the service's advisory label differs from the derived level.
    pub fn level_disagrees(&self) -> bool {
        self.turn.reported_level != self.transition.level_after
    }
}

/// One patient dialogue.
///
/// # Invariants
///
/// - `ledger.len() == state.turn_count()`
/// - anxiety is within [0, 1]
#[derive(Debug, Clone)]
pub struct PatientSession {
    id: SessionId,
    profile: PatientProfile,
    state: AnxietyState,
    ledger: DialogueLedger,
    symptom_mentions: Vec<SymptomMention>,
    created_at: Timestamp,
}

impl PatientSession {
    /// Starts a session at the profile's initial anxiety.
    pub fn start(id: SessionId, profile: PatientProfile) -> Self {
        let state = AnxietyState::initialized(&profile);
        Self {
            id,
            profile,
            state,
            ledger: DialogueLedger::new(),
            symptom_mentions: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    pub fn state(&self) -> &AnxietyState {
        &self.state
    }

    pub fn ledger(&self) -> &DialogueLedger {
        &self.ledger
    }

    pub fn symptom_mentions(&self) -> &[SymptomMention] {
        &self.symptom_mentions
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn presentation(&self) -> Result<PresentationSignal, SessionError> {
        let anxiety = self.state.current()?;
        Ok(PresentationSignal::from_state(anxiety, self.state.turn_count()))
    }

    pub fn export_transcript(&self) -> String {
        self.ledger.export(&self.profile)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turn lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Analyses the utterance and renders the prompt for the next turn.
    pub fn prepare_turn(
        &self,
        engine: &DynamicsEngine,
        utterance: &str,
    ) -> Result<PreparedTurn, SessionError> {
        let anxiety_before = self.state.current()?;
        let analysis = engine.analyzer().analyze(utterance);
        let prompt = engine.composer().compose(
            &self.profile,
            anxiety_before,
            self.ledger.turns(),
            utterance,
        );

        Ok(PreparedTurn {
            turn_index: self.state.next_turn_index(),
            utterance: utterance.to_string(),
            prompt,
            analysis,
            anxiety_before,
        })
    }

    /// Fuses the reply into the state and appends the turn.
    ///
    /// # Errors
    ///
    /// - `Uninitialized` if the state was never initialized
    /// - `TurnOutOfSequence` if `prepared` was not taken from the current state
    /// - `InvalidDelta` if fusion produced a non-finite delta
    ///
    /// On error the session is unchanged.
    pub fn record_turn(
        &mut self,
        engine: &DynamicsEngine,
        prepared: PreparedTurn,
        response: PatientResponse,
    ) -> Result<TurnOutcome, SessionError> {
        let current = self.state.current()?;
        let expected = self.state.next_turn_index();
        if prepared.turn_index != expected || prepared.anxiety_before != current {
            return Err(SessionError::TurnOutOfSequence {
                expected,
                actual: prepared.turn_index,
            });
        }

        let fusion = engine.policy().fuse(FusionInputs {
            raw_delta: response.anxiety_delta,
            lexical_delta: prepared.analysis.lexical_delta,
            current,
            turn_index: expected,
            decay_rate: self.profile.decay_rate(),
        });

        let mut next_state = self.state.clone();
        let transition = next_state.apply(fusion.adjusted_delta)?;

        let bounds = self.profile.response_length();
        let length = response.char_count();
        let length_warning = (!bounds.contains(length)).then_some(ResponseLengthWarning {
            length,
            min: bounds.min(),
            max: bounds.max(),
        });

        let symptom_mention = engine
            .symptom_cues()
            .is_symptom_question(&prepared.utterance);

        let turn = DialogueTurn {
            turn_index: transition.turn,
            interviewer_text: prepared.utterance,
            patient_text: response.response_text,
            anxiety_before: transition.before,
            anxiety_after: transition.after,
            raw_delta: fusion.raw_delta,
            lexical_delta: fusion.lexical_delta,
            attenuation_factor: fusion.attenuation_factor,
            adjusted_delta: fusion.adjusted_delta,
            understood: response.understands,
            reported_level: response.anxiety_level,
            timestamp: Timestamp::now(),
        };

        self.ledger.append(turn.clone())?;
        self.state = next_state;
        if symptom_mention {
            self.symptom_mentions.push(SymptomMention {
                turn_index: turn.turn_index,
                patient_text: turn.patient_text.clone(),
            });
        }

        Ok(TurnOutcome {
            presentation: PresentationSignal::from_state(transition.after, transition.turn),
            turn,
            transition,
            analysis: prepared.analysis,
            fusion,
            length_warning,
            symptom_mention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anxiety::FusionPolicy;
    use crate::domain::lexicon::{KeywordLexicon, KeywordSignalAnalyzer};
    use crate::domain::patient::fixtures;
    use std::sync::Arc;

    fn response(text: &str, delta: f64, level: AnxietyLevel) -> PatientResponse {
        PatientResponse {
            response_text: text.to_string(),
            anxiety_delta: delta,
            anxiety_level: level,
            understands: true,
        }
    }

    fn lexical_engine() -> DynamicsEngine {
        DynamicsEngine::new(KeywordSignalAnalyzer::with_lexicon(Arc::new(
            KeywordLexicon::default(),
        )))
    }

    #[test]
    fn attenuation_only_turn_reaches_significant() {
        let engine = DynamicsEngine::default().with_policy(FusionPolicy::attenuation_only());
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("extrovert", 0.5));

        let prepared = session.prepare_turn(&engine, "We need to run some tests.").unwrap();
        let outcome = session
            .record_turn(&engine, prepared, response("Tests? Is it bad?", 0.2, AnxietyLevel::Mild))
            .unwrap();

        assert_eq!(outcome.fusion.attenuation_factor, 0.5);
        assert_eq!(outcome.fusion.adjusted_delta, 0.1);
        assert_eq!(outcome.transition.after.value(), 0.6);
        assert_eq!(outcome.presentation.level, AnxietyLevel::Significant);
        assert_eq!(outcome.presentation.animation_intensity, 0.6);
        assert!(outcome.level_disagrees());
        assert_eq!(outcome.turn.lexical_delta, None);
        assert_eq!(session.state().turn_count(), 1);
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn prepare_does_not_mutate() {
        let engine = lexical_engine();
        let session = PatientSession::start(SessionId::new(), fixtures::profile("introvert", 0.4));

        let prepared = session
            .prepare_turn(&engine, "This is very serious, I'm afraid it might be cancer")
            .unwrap();

        assert_eq!(prepared.turn_index, 1);
        assert_eq!(prepared.analysis.lexical_delta, 0.3);
        assert!(prepared.prompt.contains("I'm afraid it might be cancer"));
        assert_eq!(session.state().turn_count(), 0);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn stale_preparation_is_rejected_without_mutation() {
        let engine = lexical_engine();
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("extrovert", 0.5));

        let stale = session.prepare_turn(&engine, "Hello").unwrap();
        let fresh = session.prepare_turn(&engine, "Hello").unwrap();
        session
            .record_turn(&engine, fresh, response("Hello doctor, nice to meet you.", 0.0, AnxietyLevel::Mild))
            .unwrap();

        let before = session.presentation().unwrap();
        let err = session
            .record_turn(&engine, stale, response("Hi.", 0.1, AnxietyLevel::Mild))
            .unwrap_err();

        assert_eq!(err, SessionError::TurnOutOfSequence { expected: 2, actual: 1 });
        assert_eq!(session.presentation().unwrap(), before);
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn short_reply_is_warned_but_applied() {
        let engine = lexical_engine();
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("introvert", 0.5));

        let prepared = session.prepare_turn(&engine, "How old are you?").unwrap();
        let outcome = session
            .record_turn(&engine, prepared, response("40.", 0.0, AnxietyLevel::Mild))
            .unwrap();

        assert_eq!(
            outcome.length_warning,
            Some(ResponseLengthWarning { length: 3, min: 10, max: 80 })
        );
        assert_eq!(session.state().turn_count(), 1);
    }

    #[test]
    fn symptom_questions_are_tracked() {
        let engine = lexical_engine();
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("extrovert", 0.3));

        let prepared = session.prepare_turn(&engine, "Where does it hurt?").unwrap();
        let outcome = session
            .record_turn(
                &engine,
                prepared,
                response("Down here on the right side.", 0.05, AnxietyLevel::Mild),
            )
            .unwrap();

        assert!(outcome.symptom_mention);
        assert_eq!(
            session.symptom_mentions(),
            [SymptomMention {
                turn_index: 1,
                patient_text: "Down here on the right side.".to_string()
            }]
        );
    }

    #[test]
    fn turn_count_tracks_ledger_length() {
        let engine = lexical_engine();
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("extrovert", 0.5));

        for (i, delta) in [0.3, -0.2, 5.0, -5.0, 0.0].into_iter().enumerate() {
            let prepared = session.prepare_turn(&engine, "Tell me more.").unwrap();
            let outcome = session
                .record_turn(&engine, prepared, response("Well, it started yesterday.", delta, AnxietyLevel::Mild))
                .unwrap();
            assert!(outcome.fusion.adjusted_delta.abs() <= 0.3);
            assert_eq!(session.state().turn_count() as usize, i + 1);
            assert_eq!(session.ledger().len(), i + 1);
        }
    }

    #[test]
    fn transcript_reflects_committed_turns() {
        let engine = lexical_engine();
        let mut session = PatientSession::start(SessionId::new(), fixtures::profile("extrovert", 0.5));
        let prepared = session.prepare_turn(&engine, "Good news, it is curable").unwrap();
        session
            .record_turn(&engine, prepared, response("Oh, that is such a relief!", -0.2, AnxietyLevel::Mild))
            .unwrap();

        let transcript = session.export_transcript();
        let after = session.ledger().turns()[0].anxiety_after.value();
        assert!(transcript.contains(&format!("Anxiety: 0.5 -> {} (understood: true)", after)));
    }
}
