//! In-Memory Transcript Sink Adapter
//!
//! Keeps exports in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{TranscriptExport, TranscriptSink, TranscriptSinkError};

/// In-memory transcript storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptSink {
    exports: Arc<RwLock<Vec<TranscriptExport>>>,
}

impl InMemoryTranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn exports(&self) -> Vec<TranscriptExport> {
        self.exports.read().await.clone()
    }

    pub async fn export_count(&self) -> usize {
        self.exports.read().await.len()
    }
}

#[async_trait]
impl TranscriptSink for InMemoryTranscriptSink {
    async fn save(&self, export: &TranscriptExport) -> Result<String, TranscriptSinkError> {
        let mut exports = self.exports.write().await;
        exports.push(export.clone());
        Ok(format!("memory://{}/{}", export.session_id, exports.len()))
    }
}
