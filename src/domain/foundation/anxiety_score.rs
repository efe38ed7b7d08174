//! Anxiety score value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A finite value between 0.0 and 1.0 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AnxietyScore(f64);

impl AnxietyScore {
    /// Completely calm.
    pub const ZERO: Self = Self(0.0);

    /// Saturated anxiety.
    pub const MAX: Self = Self(1.0);

    /// Creates a new score, clamping to the valid range.
    ///
    /// NaN maps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a score, returning error if out of range or not finite.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("anxiety", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns a new score shifted by `delta`, clamped to the valid range.
    pub fn offset(&self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for AnxietyScore {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for AnxietyScore {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<AnxietyScore> for f64 {
    fn from(score: AnxietyScore) -> Self {
        score.0
    }
}

impl fmt::Display for AnxietyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
