//! Patient response - the structured reply expected from the dialogue service.

use serde::{Deserialize, Serialize};

use crate::domain::anxiety::AnxietyLevel;
use crate::domain::session::SessionError;

/// Validated reply from the dialogue service.
///
/// Exactly the four contract fields; anything missing, extra or mistyped is
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientResponse {
    pub response_text: String,
    pub anxiety_delta: f64,
    pub anxiety_level: AnxietyLevel,
    pub understands: bool,
}

impl PatientResponse {
    /// Parses a raw completion into a response.
    ///
    /// Surrounding prose or markdown fences are tolerated as long as a single
    /// JSON object can be cut out between the first `{` and the last `}`.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` when no object is found, the object does not match
    /// the contract, or `anxiety_delta` is not finite.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let object = extract_object(raw)
            .ok_or_else(|| SessionError::malformed_response("no JSON object in response"))?;

        let response: PatientResponse = serde_json::from_str(object)
            .map_err(|e| SessionError::malformed_response(e.to_string()))?;

        if !response.anxiety_delta.is_finite() {
            return Err(SessionError::malformed_response("anxiety_delta is not finite"));
        }
        Ok(response)
    }

    /// Length of the reply in characters.
    pub fn char_count(&self) -> usize {
        self.response_text.chars().count()
    }
}

fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
