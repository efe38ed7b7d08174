//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// A case or lexicon document could not be turned into engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Failed to parse {document} document: {reason}")]
    Parse {
        document: &'static str,
        reason: String,
    },

    #[error("Invalid {document} document: {source}")]
    Invalid {
        document: &'static str,
        #[source]
        source: ValidationError,
    },
}

impl ConfigurationError {
    /// Creates a parse error for the named document kind.
    pub fn parse(document: &'static str, reason: impl Into<String>) -> Self {
        ConfigurationError::Parse {
            document,
            reason: reason.into(),
        }
    }

    /// Wraps a validation failure for the named document kind.
    pub fn invalid(document: &'static str, source: ValidationError) -> Self {
        ConfigurationError::Invalid { document, source }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    ConfigurationInvalid,

    // State errors
    SessionUninitialized,
    InvalidDelta,
    TurnOutOfSequence,

    // Dialogue service errors
    MalformedResponse,
    AIProviderError,
    Timeout,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::ConfigurationInvalid => "CONFIGURATION_INVALID",
            ErrorCode::SessionUninitialized => "SESSION_UNINITIALIZED",
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::TurnOutOfSequence => "TURN_OUT_OF_SEQUENCE",
            ErrorCode::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::new(ErrorCode::ConfigurationInvalid, err.to_string()).with_detail("field", field)
    }
}

impl From<ConfigurationError> for DomainError {
    fn from(err: ConfigurationError) -> Self {
        DomainError::new(ErrorCode::ConfigurationInvalid, err.to_string())
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
