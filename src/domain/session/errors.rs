//! Session-specific error types.

use crate::domain::foundation::{ConfigurationError, DomainError, ErrorCode};

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Case or lexicon configuration failed validation.
    Configuration(ConfigurationError),
    /// A stateful operation ran before the anxiety state was initialized.
    Uninitialized,
    /// A delta that is not a finite number reached the state.
    InvalidDelta(f64),
    /// A turn was appended out of sequence.
    TurnOutOfSequence { expected: u32, actual: u32 },
    /// The dialogue service answered with something that is not a valid patient response.
    MalformedResponse(String),
}

impl SessionError {
    pub fn malformed_response(message: impl Into<String>) -> Self {
        SessionError::MalformedResponse(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Configuration(_) => ErrorCode::ConfigurationInvalid,
            SessionError::Uninitialized => ErrorCode::SessionUninitialized,
            SessionError::InvalidDelta(_) => ErrorCode::InvalidDelta,
            SessionError::TurnOutOfSequence { .. } => ErrorCode::TurnOutOfSequence,
            SessionError::MalformedResponse(_) => ErrorCode::MalformedResponse,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::Configuration(err) => err.to_string(),
            SessionError::Uninitialized => "Anxiety state has not been initialized".to_string(),
            SessionError::InvalidDelta(delta) => format!("Delta is not a finite number: {}", delta),
            SessionError::TurnOutOfSequence { expected, actual } => {
                format!("Turn {} appended where turn {} was expected", actual, expected)
            }
            SessionError::MalformedResponse(msg) => format!("Malformed patient response: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ConfigurationError> for SessionError {
    fn from(err: ConfigurationError) -> Self {
        SessionError::Configuration(err)
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
