//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - dialogue-generation providers (OpenAI-compatible, mock)
//! - `storage` - case/lexicon documents and transcript sinks

pub mod ai;
pub mod storage;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use storage::{
    load_case, load_lexicon, DocumentLoadError, FileTranscriptSink, InMemoryTranscriptSink,
};
