//! Ingestion service coordinating extraction, chunking, embedding, and Qdrant writes.

use crate::{
    embedding::EmbeddingClient,
    extract::{DocumentExtractor, PageText},
    metrics::{IngestMetrics, MetricsSnapshot},
    processing::{
        chunking::split_text,
        types::{DocumentChunk, IngestError, IngestOutcome, IngestSettings, PipelineError},
    },
    qdrant::{PointInsert, QdrantError, QdrantService},
    uploads::{UploadStatus, UploadStore},
};
use std::sync::Arc;

/// Coordinates the full ingestion pipeline for uploaded files.
///
/// The service owns long-lived handles to the metadata store, extractor, embedding client,
/// and Qdrant transport. All collaborators are injected at construction time; build the
/// service once near process start and share it.
pub struct IngestService {
    store: Arc<dyn UploadStore>,
    extractor: Box<dyn DocumentExtractor>,
    embedding_client: Box<dyn EmbeddingClient + Send + Sync>,
    qdrant: QdrantService,
    settings: IngestSettings,
    metrics: Arc<IngestMetrics>,
}

impl IngestService {
    /// Build a new ingestion service from its collaborators.
    pub fn new(
        store: Arc<dyn UploadStore>,
        extractor: Box<dyn DocumentExtractor>,
        embedding_client: Box<dyn EmbeddingClient + Send + Sync>,
        qdrant: QdrantService,
        settings: IngestSettings,
    ) -> Self {
        Self {
            store,
            extractor,
            embedding_client,
            qdrant,
            settings,
            metrics: Arc::new(IngestMetrics::new()),
        }
    }

    /// Ensure the target collection and its payload indexes exist.
    pub async fn prepare_collection(&self) -> Result<(), QdrantError> {
        self.qdrant
            .create_collection_if_not_exists(
                &self.settings.collection,
                self.settings.embedding_dimension as u64,
            )
            .await?;
        self.qdrant
            .ensure_payload_indexes(&self.settings.collection)
            .await?;
        tracing::debug!(collection = %self.settings.collection, "Collection ready");
        Ok(())
    }

    /// Ingest one pending upload: extract, chunk, embed, write, then mark processed.
    ///
    /// The status update is the sole state transition and happens only after the vector write
    /// has been acknowledged, so a `processed` upload always has its vectors available. On any
    /// failure the upload stays `pending` and a later run may retry it.
    pub async fn ingest(
        &self,
        owner_id: &str,
        file_name: &str,
    ) -> Result<IngestOutcome, IngestError> {
        match self.store.get(owner_id, file_name).await? {
            Some(record) if record.status == UploadStatus::Pending => {}
            _ => {
                return Err(IngestError::NotFound {
                    owner_id: owner_id.to_string(),
                    file_name: file_name.to_string(),
                });
            }
        }

        let path = self.settings.uploads_dir.join(owner_id).join(file_name);
        tracing::info!(
            owner = owner_id,
            file = file_name,
            path = %path.display(),
            "Ingesting upload"
        );

        let pages = self.extractor.extract(&path).await?;
        let page_count = pages.len();
        let text = join_pages(&pages);

        let slices = split_text(
            &text,
            self.settings.chunk_size,
            self.settings.chunk_overlap,
        )?;
        let source = format!("{owner_id}/{file_name}");
        let chunks: Vec<DocumentChunk> = slices
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| DocumentChunk {
                text,
                owner_id: owner_id.to_string(),
                file_name: file_name.to_string(),
                chunk_index,
                source: source.clone(),
            })
            .collect();
        let chunk_count = chunks.len();

        if chunks.is_empty() {
            tracing::debug!(
                owner = owner_id,
                file = file_name,
                "No text extracted; nothing to embed"
            );
        } else {
            let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
            let embeddings = self
                .embedding_client
                .generate_embeddings(texts)
                .await
                .map_err(PipelineError::from)?;

            debug_assert_eq!(chunk_count, embeddings.len());

            let points: Vec<PointInsert> = chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, vector)| PointInsert {
                    vector,
                    text: chunk.text,
                    owner_id: chunk.owner_id,
                    file_name: chunk.file_name,
                    chunk_index: chunk.chunk_index,
                    source: chunk.source,
                })
                .collect();

            self.qdrant
                .index_points(&self.settings.collection, points)
                .await
                .map_err(PipelineError::from)?;
        }

        self.store
            .update_status(owner_id, file_name, UploadStatus::Processed)
            .await?;
        self.metrics.record_file(chunk_count as u64);
        tracing::info!(
            owner = owner_id,
            file = file_name,
            pages = page_count,
            chunks = chunk_count,
            "Upload processed"
        );

        Ok(IngestOutcome {
            pages: page_count,
            chunk_count,
        })
    }

    /// Return the current ingestion metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn store(&self) -> &dyn UploadStore {
        self.store.as_ref()
    }

    pub(crate) fn record_failure(&self) {
        self.metrics.record_failure();
    }
}

/// Concatenate page text in reading order, separating pages with a blank line.
fn join_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|page| page.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
