//! Core data types and error definitions for the ingestion pipeline.

use crate::{
    config::Config, embedding::EmbeddingClientError, extract::ExtractError, qdrant::QdrantError,
    uploads::StoreError,
};
use std::path::PathBuf;
use thiserror::Error;

use super::chunking::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// Errors produced while splitting raw text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Ingestion configured an impossible chunk size.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Failure of the embed-and-write stage.
///
/// Either way the upload stays `pending` and is eligible for retry; partially written vectors
/// are not cleaned up.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Embedding provider failed to produce vectors for the chunk batch.
    #[error("Failed to generate embeddings: {0}")]
    Embedding(#[from] EmbeddingClientError),
    /// Vector store rejected or failed the batch write.
    #[error("Vector store write failed: {0}")]
    VectorStore(#[from] QdrantError),
}

/// Errors emitted by a single-file ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No pending upload exists for the requested `(owner_id, file_name)` pair.
    ///
    /// Raised both for unknown uploads and for uploads that were already processed;
    /// re-processing is a caller error, never a silent retry.
    #[error("no pending upload '{file_name}' for owner '{owner_id}'")]
    NotFound {
        /// Owner the caller asked for.
        owner_id: String,
        /// File name the caller asked for.
        file_name: String,
    },
    /// Source file was unreadable or unparseable.
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    /// Chunking step failed to segment the document.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Embedding or vector-store stage failed; the upload remains pending.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// Metadata store read or write failed.
    #[error("Metadata store operation failed: {0}")]
    Store(#[from] StoreError),
}

/// A bounded slice of a document's text with positional metadata.
///
/// Chunks live only for the duration of one pipeline run; they are embedded and written to the
/// vector store, never persisted on their own.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Text content of the slice.
    pub text: String,
    /// Owner of the source upload.
    pub owner_id: String,
    /// File name of the source upload.
    pub file_name: String,
    /// Zero-based position within the file, in emission order.
    pub chunk_index: usize,
    /// Source label in `owner_id/file_name` form.
    pub source: String,
}

/// Summary of one completed file ingestion.
#[derive(Debug, Clone, Copy)]
pub struct IngestOutcome {
    /// Number of pages the extractor produced.
    pub pages: usize,
    /// Number of chunks embedded and written for the file.
    pub chunk_count: usize,
}

/// Knobs the pipeline needs at runtime, resolved once at startup.
///
/// Carried as an explicit value instead of global state so tests can construct services with
/// arbitrary settings.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Root directory holding uploads as `<owner_id>/<file_name>`.
    pub uploads_dir: PathBuf,
    /// Qdrant collection receiving vector records.
    pub collection: String,
    /// Dimensionality of the embedding vectors.
    pub embedding_dimension: usize,
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap carried between adjacent chunks, in characters.
    pub chunk_overlap: usize,
}

impl IngestSettings {
    /// Derive pipeline settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            uploads_dir: PathBuf::from(config.uploads_dir.as_deref().unwrap_or("uploads")),
            collection: config.qdrant_collection_name.clone(),
            embedding_dimension: config.embedding_dimension,
            chunk_size: config.text_splitter_chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            chunk_overlap: config
                .text_splitter_chunk_overlap
                .unwrap_or(DEFAULT_CHUNK_OVERLAP),
        }
    }
}
