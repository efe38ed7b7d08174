//! Anxiety level - categorical band derived from the numeric score.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AnxietyScore, ValidationError};

/// Categorical anxiety band.
///
/// Bands are half-open on the numeric score: `[0, 0.3)`, `[0.3, 0.6)`,
/// `[0.6, 0.8)` and `[0.8, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnxietyLevel {
    None,
    Mild,
    Significant,
    Extreme,
}

impl AnxietyLevel {
    pub const MILD_THRESHOLD: f64 = 0.3;
    pub const SIGNIFICANT_THRESHOLD: f64 = 0.6;
    pub const EXTREME_THRESHOLD: f64 = 0.8;

    /// Every level in ascending order.
    pub const ALL: [AnxietyLevel; 4] = [
        AnxietyLevel::None,
        AnxietyLevel::Mild,
        AnxietyLevel::Significant,
        AnxietyLevel::Extreme,
    ];

    pub fn from_value(value: f64) -> Self {
        if value < Self::MILD_THRESHOLD {
            AnxietyLevel::None
        } else if value < Self::SIGNIFICANT_THRESHOLD {
            AnxietyLevel::Mild
        } else if value < Self::EXTREME_THRESHOLD {
            AnxietyLevel::Significant
        } else {
            AnxietyLevel::Extreme
        }
    }

    pub fn from_score(score: AnxietyScore) -> Self {
        Self::from_value(score.value())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnxietyLevel::None => "none",
            AnxietyLevel::Mild => "mild",
            AnxietyLevel::Significant => "significant",
            AnxietyLevel::Extreme => "extreme",
        }
    }

    /// Intensity for an external animation layer, in [0, 1].
    pub fn animation_intensity(&self) -> f64 {
        match self {
            AnxietyLevel::None => 0.0,
            AnxietyLevel::Mild => 0.3,
            AnxietyLevel::Significant => 0.6,
            AnxietyLevel::Extreme => 1.0,
        }
    }
}

impl fmt::Display for AnxietyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnxietyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnxietyLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "anxiety_level",
                    format!("expected one of none, mild, significant, extreme; got '{}'", s),
                )
            })
    }
}
