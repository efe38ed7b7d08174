//! Anxiety dynamics configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::anxiety::{FusionPolicy, FusionStage, DEFAULT_DELTA_CAP};
use crate::domain::dialogue::{PromptComposer, SymptomCues, DEFAULT_HISTORY_WINDOW};
use crate::domain::lexicon::KeywordSignalAnalyzer;
use crate::domain::session::DynamicsEngine;

use super::error::ValidationError;

const MAX_HISTORY_WINDOW: usize = 20;

/// Fusion policy, prompt window and turn limits
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Named fusion preset; `full` when unset
    pub preset: Option<String>,

    /// Per-stage overrides applied on top of the preset
    pub attenuation: Option<bool>,
    pub turn_decay: Option<bool>,
    pub lexical_blend: Option<bool>,

    #[serde(default = "default_delta_cap")]
    pub delta_cap: f64,

    /// Completed turns quoted back to the patient
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Comma-separated symptom-question phrases (optional)
    pub symptom_cues: Option<String>,

    /// Upper bound on one turn, provider retries included
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,
}

impl EngineConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Resolve the preset and stage overrides into a policy
    pub fn fusion_policy(&self) -> Result<FusionPolicy, ValidationError> {
        let base = match self.preset.as_deref() {
            Some(name) => FusionPolicy::preset(name)
                .ok_or_else(|| ValidationError::UnknownFusionPreset(name.to_string()))?,
            None => FusionPolicy::full(),
        };

        let overrides = [
            (FusionStage::Attenuation, self.attenuation),
            (FusionStage::TurnDecay, self.turn_decay),
            (FusionStage::LexicalBlend, self.lexical_blend),
        ];
        let policy = overrides
            .into_iter()
            .fold(base, |policy, (stage, enabled)| match enabled {
                Some(enabled) => policy.with_stage(stage, enabled),
                None => policy,
            });

        policy
            .with_delta_cap(self.delta_cap)
            .map_err(|_| ValidationError::InvalidDeltaCap)
    }

    /// Parse symptom cues into a list
    pub fn symptom_cues_list(&self) -> Option<Vec<String>> {
        self.symptom_cues.as_ref().map(|cues| {
            cues.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    /// Assemble the per-turn collaborators around an analyzer
    pub fn dynamics_engine(
        &self,
        analyzer: KeywordSignalAnalyzer,
    ) -> Result<DynamicsEngine, ValidationError> {
        let mut engine = DynamicsEngine::new(analyzer)
            .with_policy(self.fusion_policy()?)
            .with_composer(PromptComposer::new(self.history_window));
        if let Some(cues) = self.symptom_cues_list() {
            engine = engine.with_symptom_cues(SymptomCues::new(cues));
        }
        Ok(engine)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fusion_policy()?;
        if self.history_window > MAX_HISTORY_WINDOW {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        if self.turn_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preset: None,
            attenuation: None,
            turn_decay: None,
            lexical_blend: None,
            delta_cap: default_delta_cap(),
            history_window: default_history_window(),
            symptom_cues: None,
            turn_timeout_secs: default_turn_timeout(),
        }
    }
}

fn default_delta_cap() -> f64 {
    DEFAULT_DELTA_CAP
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_turn_timeout() -> u64 {
    90
}
