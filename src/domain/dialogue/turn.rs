//! A single recorded interviewer/patient exchange.

use serde::{Deserialize, Serialize};

use crate::domain::anxiety::AnxietyLevel;
use crate::domain::foundation::{AnxietyScore, Timestamp};

/// One applied turn, immutable once appended to a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// 1-based position in the session.
    pub turn_index: u32,
    pub interviewer_text: String,
    pub patient_text: String,
    pub anxiety_before: AnxietyScore,
    pub anxiety_after: AnxietyScore,
    /// Delta proposed by the dialogue service.
    pub raw_delta: f64,
    /// Lexical delta, absent when lexical blending was disabled.
    pub lexical_delta: Option<f64>,
    pub attenuation_factor: f64,
    /// Delta actually applied to the state.
    pub adjusted_delta: f64,
    pub understood: bool,
    /// Level the dialogue service reported. Advisory only.
    pub reported_level: AnxietyLevel,
    pub timestamp: Timestamp,
}

impl DialogueTurn {
    /// Level derived from the recorded post-turn anxiety.
    pub fn level_after(&self) -> AnxietyLevel {
        AnxietyLevel::from_score(self.anxiety_after)
    }
}
