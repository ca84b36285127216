//! Transcript storage adapters.

mod in_memory_transcript_store;
mod json_file_transcript_store;

pub use in_memory_transcript_store::InMemoryTranscriptStore;
pub use json_file_transcript_store::JsonFileTranscriptStore;
