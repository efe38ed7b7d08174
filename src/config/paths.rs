//! Input and output file locations

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Case document (JSON or YAML)
    pub case_file: Option<PathBuf>,

    /// Keyword lexicon document; lexical analysis is neutral without one
    pub lexicon_file: Option<PathBuf>,

    /// Directory transcripts are written to
    #[serde(default = "default_transcript_dir")]
    pub transcript_dir: PathBuf,
}

impl PathsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.case_file.is_none() {
            return Err(ValidationError::MissingRequired("PATHS__CASE_FILE"));
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            case_file: None,
            lexicon_file: None,
            transcript_dir: default_transcript_dir(),
        }
    }
}

fn default_transcript_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_file_required() {
        assert_eq!(
            PathsConfig::default().validate(),
            Err(ValidationError::MissingRequired("PATHS__CASE_FILE"))
        );
        let config = PathsConfig {
            case_file: Some(PathBuf::from("cases/abd-001.yaml")),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.transcript_dir, PathBuf::from("transcripts"));
    }
}
