//! ExportTranscriptHandler - writes a session's committed turns to a sink.

use std::sync::Arc;

use tracing::info;

use super::SessionHandle;
use crate::ports::{TranscriptExport, TranscriptSink, TranscriptSinkError};

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportTranscriptResult {
    /// Where the sink put the transcript.
    pub location: String,
    pub export: TranscriptExport,
}

/// Handler for exporting transcripts.
pub struct ExportTranscriptHandler {
    sink: Arc<dyn TranscriptSink>,
}

impl ExportTranscriptHandler {
    pub fn new(sink: Arc<dyn TranscriptSink>) -> Self {
        Self { sink }
    }

    /// Exports committed turns only; a turn still in flight is not included.
    #[tracing::instrument(skip_all, fields(session_id = %handle.id()))]
    pub async fn handle(
        &self,
        handle: &SessionHandle,
    ) -> Result<ExportTranscriptResult, TranscriptSinkError> {
        let export = TranscriptExport::from_session(&*handle.read().await);
        let location = self.sink.save(&export).await?;

        info!(
            turns = export.turns.len(),
            symptom_mentions = export.symptom_mentions.len(),
            %location,
            "transcript exported"
        );

        Ok(ExportTranscriptResult { location, export })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTranscriptSink;
    use crate::domain::foundation::SessionId;
    use crate::domain::patient::fixtures;
    use crate::domain::session::PatientSession;

    #[tokio::test]
    async fn test_export_empty_session() {
        let sink = Arc::new(InMemoryTranscriptSink::new());
        let handler = ExportTranscriptHandler::new(sink.clone());
        let handle = SessionHandle::new(PatientSession::start(
            SessionId::new(),
            fixtures::profile("introvert", 0.4),
        ));

        let result = handler.handle(&handle).await.unwrap();

        assert!(result.location.starts_with("memory://"));
        assert!(result.export.turns.is_empty());
        assert!(result.export.text.contains("Case: Acute abdominal pain (abd-001)"));
        assert_eq!(sink.export_count().await, 1);
    }
}
