//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - dialogue-generation service that plays the patient
//! - `TranscriptSink` - destination for finished interview transcripts

mod ai_provider;
mod transcript_sink;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use transcript_sink::{TranscriptExport, TranscriptSink, TranscriptSinkError};
