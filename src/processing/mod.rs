//! Document processing pipeline: extraction, chunking, embedding, and Qdrant orchestration.

pub mod chunking;
mod service;
pub mod types;

pub use service::IngestService;
pub use types::{
    ChunkingError, DocumentChunk, IngestError, IngestOutcome, IngestSettings, PipelineError,
};
