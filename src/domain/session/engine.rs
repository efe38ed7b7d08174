//! Dynamics engine - the stateless collaborators every session turn uses.

use crate::domain::anxiety::FusionPolicy;
use crate::domain::dialogue::{PromptComposer, SymptomCues};
use crate::domain::lexicon::KeywordSignalAnalyzer;

/// Analyzer, composer, fusion policy and symptom cues.
///
/// Holds no per-session state, so one engine can serve any number of
/// sessions; the lexicon inside the analyzer is shared read-only.
#[derive(Debug, Clone, Default)]
pub struct DynamicsEngine {
    analyzer: KeywordSignalAnalyzer,
    composer: PromptComposer,
    policy: FusionPolicy,
    cues: SymptomCues,
}

impl DynamicsEngine {
    pub fn new(analyzer: KeywordSignalAnalyzer) -> Self {
        Self {
            analyzer,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: FusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_symptom_cues(mut self, cues: SymptomCues) -> Self {
        self.cues = cues;
        self
    }

    pub fn analyzer(&self) -> &KeywordSignalAnalyzer {
        &self.analyzer
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    pub fn symptom_cues(&self) -> &SymptomCues {
        &self.cues
    }
}
