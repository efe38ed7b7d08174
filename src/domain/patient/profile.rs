//! Patient profile - the immutable case configuration a session runs against.
//!
//! Profiles are authored as case documents (JSON or YAML):
//!
//! ```json
//! {
//!   "case_id": "abd-001",
//!   "case_name": "Acute abdominal pain",
//!   "personality": "introvert",
//!   "personality_params": {
//!     "base_anxiety_decay": 0.05,
//!     "response_length_min": 10,
//!     "response_length_max": 40
//!   },
//!   "initial_anxiety": 0.6,
//!   "symptoms": "Sharp pain in the lower right abdomen since last night"
//! }
//! ```
//!
//! Every field is required. Validation failures surface as
//! [`ConfigurationError`]; nothing falls back to a default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AnxietyScore, CaseId, ConfigurationError, ValidationError};

const DOCUMENT: &str = "case";

/// Personality archetype driving prompt directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Proactive, talkative, trusting.
    Extrovert,
    /// Brief, hesitant, guarded.
    Introvert,
}

impl Personality {
    /// Returns the wire tag for this personality.
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Extrovert => "extrovert",
            Personality::Introvert => "introvert",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extrovert" => Ok(Personality::Extrovert),
            "introvert" => Ok(Personality::Introvert),
            other => Err(ValidationError::invalid_format(
                "personality",
                format!("expected 'extrovert' or 'introvert', got '{}'", other),
            )),
        }
    }
}

/// Inclusive bounds on the patient's response length, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLengthBounds {
    min: u32,
    max: u32,
}

impl ResponseLengthBounds {
    /// Creates bounds, rejecting `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::out_of_range(
                "response_length_min",
                0.0,
                f64::from(max),
                f64::from(min),
            ));
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Returns true if `length` falls within the bounds.
    pub fn contains(&self, length: usize) -> bool {
        length >= self.min as usize && length <= self.max as usize
    }
}

/// Case document as authored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDocument {
    pub case_id: String,
    pub case_name: String,
    pub personality: String,
    pub personality_params: PersonalityParams,
    pub initial_anxiety: f64,
    pub symptoms: String,
}

/// Personality tuning block of a case document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityParams {
    pub base_anxiety_decay: f64,
    pub response_length_min: u32,
    pub response_length_max: u32,
}

/// Immutable patient case configuration.
///
/// # Invariants
///
/// - `case_name` and `symptoms` are non-blank
/// - `decay_rate` is finite and non-negative
/// - `initial_anxiety` is within [0, 1]
/// - response length `min <= max`
#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfile {
    case_id: CaseId,
    case_name: String,
    personality: Personality,
    decay_rate: f64,
    response_length: ResponseLengthBounds,
    initial_anxiety: AnxietyScore,
    symptoms: String,
}

impl PatientProfile {
    /// Parses and validates a JSON case document.
    pub fn from_json(source: &str) -> Result<Self, ConfigurationError> {
        let document: CaseDocument = serde_json::from_str(source)
            .map_err(|e| ConfigurationError::parse(DOCUMENT, e.to_string()))?;
        Self::try_from(document)
    }

    /// Parses and validates a YAML case document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigurationError> {
        let document: CaseDocument = serde_yaml::from_str(source)
            .map_err(|e| ConfigurationError::parse(DOCUMENT, e.to_string()))?;
        Self::try_from(document)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    /// Per-turn de-escalation rate applied by the turn-decay policy.
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn response_length(&self) -> ResponseLengthBounds {
        self.response_length
    }

    pub fn initial_anxiety(&self) -> AnxietyScore {
        self.initial_anxiety
    }

    /// Free-text description of the presenting complaint.
    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    fn validate(document: CaseDocument) -> Result<Self, ValidationError> {
        let case_id = CaseId::new(document.case_id)?;

        if document.case_name.trim().is_empty() {
            return Err(ValidationError::empty_field("case_name"));
        }
        if document.symptoms.trim().is_empty() {
            return Err(ValidationError::empty_field("symptoms"));
        }

        let personality = document.personality.parse::<Personality>()?;

        let params = document.personality_params;
        if !params.base_anxiety_decay.is_finite() || params.base_anxiety_decay < 0.0 {
            return Err(ValidationError::out_of_range(
                "base_anxiety_decay",
                0.0,
                f64::MAX,
                params.base_anxiety_decay,
            ));
        }

        let response_length =
            ResponseLengthBounds::new(params.response_length_min, params.response_length_max)?;

        let initial_anxiety = AnxietyScore::try_new(document.initial_anxiety).map_err(|_| {
            ValidationError::out_of_range("initial_anxiety", 0.0, 1.0, document.initial_anxiety)
        })?;

        Ok(Self {
            case_id,
            case_name: document.case_name,
            personality,
            decay_rate: params.base_anxiety_decay,
            response_length,
            initial_anxiety,
            symptoms: document.symptoms,
        })
    }
}

impl TryFrom<CaseDocument> for PatientProfile {
    type Error = ConfigurationError;

    fn try_from(document: CaseDocument) -> Result<Self, Self::Error> {
        Self::validate(document).map_err(|e| ConfigurationError::invalid(DOCUMENT, e))
    }
}
