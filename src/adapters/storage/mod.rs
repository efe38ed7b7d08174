//! Storage Adapters
//!
//! File-backed inputs and outputs of an interview.
//!
//! ## Available Adapters
//!
//! - **FileTranscriptSink** - Writes transcripts and turn records to disk
//! - **InMemoryTranscriptSink** - Keeps transcripts in memory (testing/development)
//! - **load_case / load_lexicon** - Read JSON or YAML configuration documents
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{load_case, FileTranscriptSink};
//!
//! let profile = load_case("cases/appendicitis.yaml").await?;
//! let sink = FileTranscriptSink::new("./transcripts");
//! ```

mod document_loader;
mod file_transcript_sink;
mod in_memory_transcript_sink;

pub use document_loader::{load_case, load_lexicon, DocumentLoadError};
pub use file_transcript_sink::FileTranscriptSink;
pub use in_memory_transcript_sink::InMemoryTranscriptSink;
