//! Transcript Sink Port - Interface for persisting finished interview transcripts.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::dialogue::{DialogueTurn, SymptomMention};
use crate::domain::foundation::{CaseId, SessionId, Timestamp};
use crate::domain::session::PatientSession;

/// Errors that can occur while writing a transcript.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptSinkError {
    #[error("Failed to serialize transcript: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Everything exported for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptExport {
    pub session_id: SessionId,
    pub case_id: CaseId,
    pub case_name: String,
    /// Plain-text transcript.
    pub text: String,
    pub turns: Vec<DialogueTurn>,
    pub symptom_mentions: Vec<SymptomMention>,
    pub exported_at: Timestamp,
}

impl TranscriptExport {
    pub fn from_session(session: &PatientSession) -> Self {
        let profile = session.profile();
        Self {
            session_id: session.id(),
            case_id: profile.case_id().clone(),
            case_name: profile.case_name().to_string(),
            text: session.export_transcript(),
            turns: session.ledger().turns().to_vec(),
            symptom_mentions: session.symptom_mentions().to_vec(),
            exported_at: Timestamp::now(),
        }
    }
}

/// Port for persisting transcripts.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Persists the export and returns where it was written.
    async fn save(&self, export: &TranscriptExport) -> Result<String, TranscriptSinkError>;
}
