//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Retry count exceeds maximum allowed (10)")]
    TooManyRetries,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid AI base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Delta cap must be in (0.0, 1.0]")]
    InvalidDeltaCap,

    #[error("History window must be between 0 and 20 turns")]
    InvalidHistoryWindow,

    #[error("Unknown fusion preset: {0}")]
    UnknownFusionPreset(String),

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
