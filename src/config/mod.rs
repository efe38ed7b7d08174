//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `VIRTUAL_PATIENT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use virtual_patient::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Patient played by {}", config.ai.model);
//! ```

mod ai;
mod engine;
mod error;
mod logging;
mod paths;

pub use ai::{AiConfig, AiProvider};
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use paths::PathsConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads; [`AppConfig::validate()`]
/// then reports what is still missing (case file, API key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Dialogue-service provider (OpenAI or mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Fusion policy, prompt window, turn timeout
    #[serde(default)]
    pub engine: EngineConfig,

    /// Case, lexicon and transcript locations
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VIRTUAL_PATIENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VIRTUAL_PATIENT__PATHS__CASE_FILE=cases/abd-001.yaml` -> `paths.case_file`
    /// - `VIRTUAL_PATIENT__ENGINE__PRESET=attenuation_only` -> `engine.preset`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VIRTUAL_PATIENT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.engine.validate()?;
        self.paths.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
