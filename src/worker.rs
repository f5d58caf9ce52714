//! Batch scanner/runner over pending uploads.
//!
//! One run lists every pending upload, optionally scoped to a single owner, and feeds each
//! file through the ingestion pipeline strictly sequentially. Per-file failures are logged
//! and counted but never abort the batch; only a failure of the listing itself is fatal.

use crate::{processing::IngestService, uploads::StoreError};
use thiserror::Error;

/// Fatal failure of a batch run: the pending list could not be produced.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Metadata store failed while listing pending uploads.
    #[error("failed to list pending uploads: {0}")]
    Listing(#[from] StoreError),
}

/// Aggregate result of one batch run, returned so callers can surface partial failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    /// Uploads that reached `processed`.
    pub succeeded: usize,
    /// Uploads that failed and remain `pending`.
    pub failed: usize,
    /// Total chunks written across all processed uploads.
    pub chunks_indexed: usize,
}

/// Process all pending uploads, optionally scoped to one owner.
///
/// Files are handled in the order the store lists them, one at a time. An empty pending list
/// returns immediately with a zeroed outcome.
pub async fn run_worker(
    service: &IngestService,
    owner_id: Option<&str>,
) -> Result<BatchOutcome, ScanError> {
    let pending = service.store().list_pending(owner_id).await?;

    if pending.is_empty() {
        tracing::info!(owner = ?owner_id, "No unprocessed uploads found");
        return Ok(BatchOutcome::default());
    }

    tracing::info!(files = pending.len(), owner = ?owner_id, "Starting batch run");
    let mut outcome = BatchOutcome::default();
    for record in &pending {
        match service.ingest(&record.owner_id, &record.file_name).await {
            Ok(result) => {
                outcome.succeeded += 1;
                outcome.chunks_indexed += result.chunk_count;
            }
            Err(error) => {
                outcome.failed += 1;
                service.record_failure();
                tracing::error!(
                    owner = %record.owner_id,
                    file = %record.file_name,
                    error = %error,
                    "Failed to process upload; leaving it pending"
                );
            }
        }
    }

    tracing::info!(
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        chunks = outcome.chunks_indexed,
        "Batch run complete"
    );
    Ok(outcome)
}
