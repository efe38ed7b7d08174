//! Case and lexicon document loading.
//!
//! Documents are JSON or YAML, chosen by file extension.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ConfigurationError;
use crate::domain::lexicon::KeywordLexicon;
use crate::domain::patient::PatientProfile;

/// Errors that can occur while loading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentLoadError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Unsupported document format for {0}: expected .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, DocumentLoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => Err(DocumentLoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

async fn read(path: &Path) -> Result<(DocumentFormat, String), DocumentLoadError> {
    let format = DocumentFormat::from_path(path)?;
    let source = fs::read_to_string(path)
        .await
        .map_err(|e| DocumentLoadError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok((format, source))
}

/// Loads and validates a patient case.
pub async fn load_case(path: impl AsRef<Path>) -> Result<PatientProfile, DocumentLoadError> {
    let (format, source) = read(path.as_ref()).await?;
    let profile = match format {
        DocumentFormat::Json => PatientProfile::from_json(&source)?,
        DocumentFormat::Yaml => PatientProfile::from_yaml(&source)?,
    };
    Ok(profile)
}

/// Loads and validates a keyword lexicon.
///
/// `None` means no lexicon is configured; lexical analysis is then neutral.
pub async fn load_lexicon(
    path: Option<impl AsRef<Path>>,
) -> Result<Option<KeywordLexicon>, DocumentLoadError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let (format, source) = read(path.as_ref()).await?;
    let lexicon = match format {
        DocumentFormat::Json => KeywordLexicon::from_json(&source)?,
        DocumentFormat::Yaml => KeywordLexicon::from_yaml(&source)?,
    };
    Ok(Some(lexicon))
}
