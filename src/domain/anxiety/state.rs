//! Anxiety state - the mutable per-session score and turn counter.

use serde::{Deserialize, Serialize};

use super::AnxietyLevel;
use crate::domain::foundation::AnxietyScore;
use crate::domain::patient::PatientProfile;
use crate::domain::session::SessionError;

/// Current anxiety and number of applied turns for one session.
///
/// A live session's state comes from [`initialized`](Self::initialized).
/// The default value is uninitialized and rejects every stateful operation.
///
/// # Invariants
///
/// - `current` is always within [0, 1]
/// - `turn_count` only grows, by exactly 1 per successful [`apply`](Self::apply)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnxietyState {
    current: Option<AnxietyScore>,
    turn_count: u32,
}

/// Result of applying one adjusted delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnxietyTransition {
    /// 1-based index of the turn that produced this transition.
    pub turn: u32,
    pub before: AnxietyScore,
    pub after: AnxietyScore,
    pub level_before: AnxietyLevel,
    pub level_after: AnxietyLevel,
}

impl AnxietyTransition {
    pub fn level_changed(&self) -> bool {
        self.level_before != self.level_after
    }

    /// True when this turn moved anxiety into the extreme band.
    pub fn crossed_into_extreme(&self) -> bool {
        self.level_before != AnxietyLevel::Extreme && self.level_after == AnxietyLevel::Extreme
    }
}

impl AnxietyState {
    /// State at the profile's initial anxiety with no turns applied.
    ///
    /// There is no way to reset an existing state, so `turn_count` never
    /// moves backwards.
    pub fn initialized(profile: &PatientProfile) -> Self {
        Self {
            current: Some(profile.initial_anxiety()),
            turn_count: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Result<AnxietyScore, SessionError> {
        self.current.ok_or(SessionError::Uninitialized)
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Index the next applied turn will carry.
    pub fn next_turn_index(&self) -> u32 {
        self.turn_count + 1
    }

    pub fn level(&self) -> Result<AnxietyLevel, SessionError> {
        self.current().map(AnxietyLevel::from_score)
    }

    /// Applies an adjusted delta, clamping the result to [0, 1].
    ///
    /// # Errors
    ///
    /// - `Uninitialized` on a state not built by [`initialized`](Self::initialized)
    /// - `InvalidDelta` if `delta` is NaN or infinite
    ///
    /// Neither error changes the state.
    pub fn apply(&mut self, delta: f64) -> Result<AnxietyTransition, SessionError> {
        let before = self.current()?;
        if !delta.is_finite() {
            return Err(SessionError::InvalidDelta(delta));
        }

        let after = before.offset(delta);
        self.current = Some(after);
        self.turn_count += 1;

        Ok(AnxietyTransition {
            turn: self.turn_count,
            before,
            after,
            level_before: AnxietyLevel::from_score(before),
            level_after: AnxietyLevel::from_score(after),
        })
    }
}
