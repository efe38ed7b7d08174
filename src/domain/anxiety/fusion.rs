//! Delta fusion - combines the dialogue-service delta, the lexical delta and
//! turn decay into one bounded adjustment.
//!
//! The pipeline is built from three stages that can each be switched off:
//!
//! | Stage          | Effect                                                    |
//! |----------------|-----------------------------------------------------------|
//! | `Attenuation`  | scales the raw delta by distance to the saturated extreme |
//! | `TurnDecay`    | subtracts a rapport term that ramps up over five turns    |
//! | `LexicalBlend` | mixes in the lexical delta, reinforcing agreeing signs    |
//!
//! The final clamp to `[-delta_cap, delta_cap]` always runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AnxietyScore, ValidationError};
use crate::domain::lexicon::LEXICAL_DELTA_BOUND;

/// Default bound on any applied delta.
pub const DEFAULT_DELTA_CAP: f64 = 0.3;

const DECAY_RAMP_PER_TURN: f64 = 0.2;
const EXTERNAL_WEIGHT: f64 = 0.7;
const LEXICAL_WEIGHT: f64 = 0.3;
const REINFORCEMENT: f64 = 1.2;

/// One toggleable step of the fusion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStage {
    Attenuation,
    TurnDecay,
    LexicalBlend,
}

impl FusionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionStage::Attenuation => "attenuation",
            FusionStage::TurnDecay => "turn_decay",
            FusionStage::LexicalBlend => "lexical_blend",
        }
    }
}

/// Everything fusion needs for one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionInputs {
    /// Delta proposed by the dialogue service, of any magnitude.
    pub raw_delta: f64,
    /// Lexical delta from the interviewer's utterance.
    pub lexical_delta: f64,
    /// Anxiety before this turn.
    pub current: AnxietyScore,
    /// 1-based index of the turn being applied.
    pub turn_index: u32,
    pub decay_rate: f64,
}

/// Intermediate values of one fusion run, kept for inspection and the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionBreakdown {
    pub raw_delta: f64,
    /// 1.0 when attenuation is disabled.
    pub attenuation_factor: f64,
    pub attenuated: f64,
    /// Negative de-escalation term, present when turn decay ran.
    pub decay_term: Option<f64>,
    /// Lexical delta used, present when lexical blending ran.
    pub lexical_delta: Option<f64>,
    pub reinforced: bool,
    /// Value before the final clamp.
    pub combined: f64,
    pub adjusted_delta: f64,
}

/// Which fusion stages run, and the final cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionPolicy {
    pub attenuation: bool,
    pub turn_decay: bool,
    pub lexical_blend: bool,
    pub delta_cap: f64,
}

impl FusionPolicy {
    /// Clamp only.
    pub fn plain_clamp() -> Self {
        Self::with_stages(false, false, false)
    }

    pub fn decay_only() -> Self {
        Self::with_stages(false, true, false)
    }

    pub fn attenuation_only() -> Self {
        Self::with_stages(true, false, false)
    }

    pub fn attenuation_with_lexical() -> Self {
        Self::with_stages(true, false, true)
    }

    /// Attenuation, turn decay and lexical blending.
    pub fn full() -> Self {
        Self::with_stages(true, true, true)
    }

    fn with_stages(attenuation: bool, turn_decay: bool, lexical_blend: bool) -> Self {
        Self {
            attenuation,
            turn_decay,
            lexical_blend,
            delta_cap: DEFAULT_DELTA_CAP,
        }
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "plain_clamp" => Some(Self::plain_clamp()),
            "decay_only" => Some(Self::decay_only()),
            "attenuation_only" => Some(Self::attenuation_only()),
            "attenuation_with_lexical" => Some(Self::attenuation_with_lexical()),
            "full" => Some(Self::full()),
            _ => None,
        }
    }

    pub fn with_stage(mut self, stage: FusionStage, enabled: bool) -> Self {
        match stage {
            FusionStage::Attenuation => self.attenuation = enabled,
            FusionStage::TurnDecay => self.turn_decay = enabled,
            FusionStage::LexicalBlend => self.lexical_blend = enabled,
        }
        self
    }

    pub fn with_delta_cap(mut self, cap: f64) -> Result<Self, ValidationError> {
        if !(cap > 0.0 && cap <= 1.0) {
            return Err(ValidationError::out_of_range("delta_cap", 0.0, 1.0, cap));
        }
        self.delta_cap = cap;
        Ok(self)
    }

    pub fn is_enabled(&self, stage: FusionStage) -> bool {
        match stage {
            FusionStage::Attenuation => self.attenuation,
            FusionStage::TurnDecay => self.turn_decay,
            FusionStage::LexicalBlend => self.lexical_blend,
        }
    }

    /// Enabled stages in pipeline order.
    pub fn stages(&self) -> Vec<FusionStage> {
        [
            FusionStage::Attenuation,
            FusionStage::TurnDecay,
            FusionStage::LexicalBlend,
        ]
        .into_iter()
        .filter(|stage| self.is_enabled(*stage))
        .collect()
    }

    /// Runs the enabled stages and clamps the result.
    pub fn fuse(&self, inputs: FusionInputs) -> FusionBreakdown {
        let attenuation_factor = if self.attenuation {
            attenuation_factor(inputs.raw_delta, inputs.current)
        } else {
            1.0
        };
        let attenuated = inputs.raw_delta * attenuation_factor;

        let decay_term = self
            .turn_decay
            .then(|| decay_term(inputs.decay_rate, inputs.turn_index));
        let decayed = attenuated + decay_term.unwrap_or(0.0);

        let (combined, lexical_delta, reinforced) = if self.lexical_blend {
            let lexical = if inputs.lexical_delta.is_finite() {
                inputs
                    .lexical_delta
                    .clamp(-LEXICAL_DELTA_BOUND, LEXICAL_DELTA_BOUND)
            } else {
                0.0
            };
            let (combined, reinforced) = blend(decayed, lexical);
            (combined, Some(lexical), reinforced)
        } else {
            (decayed, None, false)
        };

        FusionBreakdown {
            raw_delta: inputs.raw_delta,
            attenuation_factor,
            attenuated,
            decay_term,
            lexical_delta,
            reinforced,
            combined,
            adjusted_delta: combined.clamp(-self.delta_cap, self.delta_cap),
        }
    }
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for FusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages = self.stages();
        if stages.is_empty() {
            return f.write_str("plain_clamp");
        }
        let names: Vec<&str> = stages.iter().map(FusionStage::as_str).collect();
        f.write_str(&names.join("+"))
    }
}

/// Scaling applied to a raw delta at the current anxiety.
///
/// Escalation fades to nothing as anxiety approaches 1, de-escalation as it
/// approaches 0.
pub fn attenuation_factor(raw_delta: f64, current: AnxietyScore) -> f64 {
    if raw_delta > 0.0 {
        1.0 - current.value()
    } else {
        current.value()
    }
}

/// De-escalating rapport term for the given 1-based turn.
pub fn decay_term(decay_rate: f64, turn_index: u32) -> f64 {
    -(decay_rate * (turn_index as f64 * DECAY_RAMP_PER_TURN).min(1.0))
}

/// Weighted blend of the external and lexical signals.
///
/// Returns the blended value and whether the agreeing-sign reinforcement
/// was applied.
pub fn blend(external: f64, lexical: f64) -> (f64, bool) {
    let combined = external * EXTERNAL_WEIGHT + lexical * LEXICAL_WEIGHT;
    let agree = external != 0.0 && lexical != 0.0 && external.signum() == lexical.signum();
    if agree {
        (combined * REINFORCEMENT, true)
    } else {
        (combined, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(raw_delta: f64, lexical_delta: f64, current: f64, turn_index: u32) -> FusionInputs {
        FusionInputs {
            raw_delta,
            lexical_delta,
            current: AnxietyScore::new(current),
            turn_index,
            decay_rate: 0.05,
        }
    }

    #[test]
    fn attenuation_only_halves_delta_at_midpoint() {
        let breakdown = FusionPolicy::attenuation_only().fuse(inputs(0.2, 0.3, 0.5, 1));
        assert_eq!(breakdown.attenuation_factor, 0.5);
        assert_eq!(breakdown.adjusted_delta, 0.1);
        assert_eq!(breakdown.lexical_delta, None);
        assert_eq!(breakdown.decay_term, None);
        assert_eq!(AnxietyScore::new(0.5).offset(breakdown.adjusted_delta).value(), 0.6);
    }

    #[test]
    fn attenuation_vanishes_at_saturated_extremes() {
        assert_eq!(attenuation_factor(0.2, AnxietyScore::MAX), 0.0);
        assert_eq!(attenuation_factor(0.2, AnxietyScore::ZERO), 1.0);
        assert_eq!(attenuation_factor(-0.2, AnxietyScore::ZERO), 0.0);
        assert_eq!(attenuation_factor(-0.2, AnxietyScore::MAX), 1.0);
    }

    #[test]
    fn plain_clamp_caps_upstream_magnitude() {
        let policy = FusionPolicy::plain_clamp();
        assert_eq!(policy.fuse(inputs(5.0, 0.0, 0.5, 1)).adjusted_delta, 0.3);
        assert_eq!(policy.fuse(inputs(-5.0, 0.0, 0.5, 1)).adjusted_delta, -0.3);
        assert_eq!(policy.fuse(inputs(0.05, 0.0, 0.5, 1)).adjusted_delta, 0.05);
    }

    #[test]
    fn decay_ramps_over_five_turns() {
        assert!((decay_term(0.05, 1) - -0.01).abs() < 1e-12);
        assert!((decay_term(0.05, 3) - -0.03).abs() < 1e-12);
        assert_eq!(decay_term(0.05, 5), -0.05);
        assert_eq!(decay_term(0.05, 12), -0.05);
        assert_eq!(decay_term(0.0, 4), 0.0);
    }

    #[test]
    fn decay_only_lowers_a_neutral_turn() {
        let breakdown = FusionPolicy::decay_only().fuse(inputs(0.0, 0.0, 0.5, 5));
        assert_eq!(breakdown.decay_term, Some(-0.05));
        assert_eq!(breakdown.adjusted_delta, -0.05);
    }

    #[test]
    fn agreeing_signals_are_reinforced() {
        let breakdown = FusionPolicy::attenuation_with_lexical().fuse(inputs(0.2, 0.1, 0.5, 1));
        // 0.1 * 0.7 + 0.1 * 0.3 = 0.1, then * 1.2
        assert!(breakdown.reinforced);
        assert!((breakdown.adjusted_delta - 0.12).abs() < 1e-12);
    }

    #[test]
    fn disagreeing_signals_are_not_reinforced() {
        let breakdown = FusionPolicy::attenuation_with_lexical().fuse(inputs(0.2, -0.1, 0.5, 1));
        assert!(!breakdown.reinforced);
        assert!((breakdown.adjusted_delta - 0.04).abs() < 1e-12);
    }

    #[test]
    fn zero_signal_never_reinforces() {
        let (combined, reinforced) = blend(0.0, 0.2);
        assert!(!reinforced);
        assert!((combined - 0.06).abs() < 1e-12);
    }

    #[test]
    fn full_policy_runs_every_stage() {
        let breakdown = FusionPolicy::default().fuse(inputs(0.2, 0.1, 0.5, 5));
        // attenuated 0.1, decayed 0.05, blended 0.05*0.7 + 0.1*0.3 = 0.065, reinforced
        assert_eq!(breakdown.decay_term, Some(-0.05));
        assert_eq!(breakdown.lexical_delta, Some(0.1));
        assert!(breakdown.reinforced);
        assert!((breakdown.adjusted_delta - 0.078).abs() < 1e-12);
    }

    #[test]
    fn non_finite_lexical_signal_is_neutral() {
        for lexical in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let breakdown = FusionPolicy::full().fuse(inputs(0.2, lexical, 0.5, 5));
            assert_eq!(breakdown.lexical_delta, Some(0.0));
            assert!(breakdown.adjusted_delta.is_finite());
            assert!(breakdown.adjusted_delta.abs() <= 0.3);
            // decayed 0.05 blended with a neutral lexical signal
            assert!((breakdown.adjusted_delta - 0.035).abs() < 1e-12);
        }
    }

    #[test]
    fn stages_toggle_independently() {
        let policy = FusionPolicy::full().with_stage(FusionStage::TurnDecay, false);
        assert_eq!(policy, FusionPolicy::attenuation_with_lexical());
        assert_eq!(
            policy.stages(),
            vec![FusionStage::Attenuation, FusionStage::LexicalBlend]
        );
        assert_eq!(policy.to_string(), "attenuation+lexical_blend");
        assert_eq!(FusionPolicy::plain_clamp().to_string(), "plain_clamp");
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(FusionPolicy::preset("decay_only"), Some(FusionPolicy::decay_only()));
        assert_eq!(FusionPolicy::preset("full"), Some(FusionPolicy::full()));
        assert_eq!(FusionPolicy::preset("aggressive"), None);
    }

    #[test]
    fn delta_cap_must_be_in_unit_interval() {
        assert!(FusionPolicy::full().with_delta_cap(0.0).is_err());
        assert!(FusionPolicy::full().with_delta_cap(1.5).is_err());
        assert!(FusionPolicy::full().with_delta_cap(f64::NAN).is_err());
        let policy = FusionPolicy::plain_clamp().with_delta_cap(0.1).unwrap();
        assert_eq!(policy.fuse(inputs(0.5, 0.0, 0.5, 1)).adjusted_delta, 0.1);
    }

    proptest! {
        #[test]
        fn adjusted_delta_never_exceeds_cap(
            raw in -100.0f64..100.0,
            lexical in -1.0f64..1.0,
            current in 0.0f64..=1.0,
            turn in 1u32..50,
            attenuation in any::<bool>(),
            turn_decay in any::<bool>(),
            lexical_blend in any::<bool>(),
        ) {
            let policy = FusionPolicy { attenuation, turn_decay, lexical_blend, delta_cap: DEFAULT_DELTA_CAP };
            let breakdown = policy.fuse(inputs(raw, lexical, current, turn));
            prop_assert!(breakdown.adjusted_delta.abs() <= DEFAULT_DELTA_CAP);
        }

        #[test]
        fn attenuation_factor_stays_in_unit_interval(raw in -1.0f64..1.0, current in 0.0f64..=1.0) {
            let factor = attenuation_factor(raw, AnxietyScore::new(current));
            prop_assert!((0.0..=1.0).contains(&factor));
        }
    }
}
