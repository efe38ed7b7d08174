//! File-based Transcript Sink Adapter
//!
//! Writes each export as two files in one directory:
//!
//! - `<case_name>_log.txt` - the plain-text transcript
//! - `<case_name>_turns.yaml` - every turn with its fusion details

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{TranscriptExport, TranscriptSink, TranscriptSinkError};

/// File-based transcript storage.
#[derive(Debug, Clone)]
pub struct FileTranscriptSink {
    base_path: PathBuf,
}

impl FileTranscriptSink {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the plain-text transcript for a case.
    pub fn transcript_path(&self, case_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_log.txt", file_stem(case_name)))
    }

    /// Path of the structured turn record for a case.
    pub fn turns_path(&self, case_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_turns.yaml", file_stem(case_name)))
    }

    async fn ensure_dir(&self) -> Result<(), TranscriptSinkError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| TranscriptSinkError::IoError(e.to_string()))
    }
}

#[async_trait]
impl TranscriptSink for FileTranscriptSink {
    async fn save(&self, export: &TranscriptExport) -> Result<String, TranscriptSinkError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(export)
            .map_err(|e| TranscriptSinkError::SerializationFailed(e.to_string()))?;

        let transcript_path = self.transcript_path(&export.case_name);
        fs::write(&transcript_path, &export.text)
            .await
            .map_err(|e| TranscriptSinkError::IoError(e.to_string()))?;
        fs::write(self.turns_path(&export.case_name), yaml)
            .await
            .map_err(|e| TranscriptSinkError::IoError(e.to_string()))?;

        Ok(transcript_path.display().to_string())
    }
}

/// Case name reduced to characters safe in a file name.
fn file_stem(case_name: &str) -> String {
    let stem: String = case_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "case".to_string()
    } else {
        stem
    }
}
