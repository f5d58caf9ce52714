//! PDF text extraction.
//!
//! Extraction is the only stage that touches uploaded bytes, and it is read-only. The
//! [`DocumentExtractor`] trait keeps the pipeline testable without real PDF fixtures;
//! [`PdfExtractor`] is the production implementation backed by `pdf-extract`, run on the
//! blocking thread pool because PDF parsing is CPU-bound.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while turning a stored file into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The storage path did not resolve to a readable file.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The file's bytes could not be parsed as a PDF.
    #[error("failed to parse '{path}' as PDF: {source}")]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: pdf_extract::OutputError,
    },
    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Text recovered from one page of a document, in reading order.
#[derive(Debug, Clone)]
pub struct PageText {
    /// One-based page number.
    pub page_number: usize,
    /// Raw text content of the page.
    pub text: String,
}

/// Contract for turning a storage path into ordered page text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract page-level text segments from the file at `path`.
    async fn extract(&self, path: &Path) -> Result<Vec<PageText>, ExtractError>;
}

/// Production extractor for PDF uploads.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<Vec<PageText>, ExtractError> {
        let path = path.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path).map_err(|source| ExtractError::Io {
                path: path.clone(),
                source,
            })?;
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|source| ExtractError::Parse { path, source })
        })
        .await??;

        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(index, text)| PageText {
                page_number: index + 1,
                text,
            })
            .collect())
    }
}
