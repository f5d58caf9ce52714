use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing ingestion activity.
#[derive(Default)]
pub struct IngestMetrics {
    files_processed: AtomicU64,
    files_failed: AtomicU64,
    chunks_indexed: AtomicU64,
}

impl IngestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed upload and the number of chunks produced for it.
    pub fn record_file(&self, chunk_count: u64) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_indexed.fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Record an upload whose ingestion failed and was left pending.
    pub fn record_failure(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_processed: self.files_processed.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            chunks_indexed: self.chunks_indexed.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of ingestion counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of uploads processed to completion since startup.
    pub files_processed: u64,
    /// Number of uploads that failed and remain pending.
    pub files_failed: u64,
    /// Total chunk count written across all processed uploads.
    pub chunks_indexed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_files_and_chunks() {
        let metrics = IngestMetrics::new();
        metrics.record_file(2);
        metrics.record_file(3);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.files_processed, 2);
        assert_eq!(snapshot.files_failed, 1);
        assert_eq!(snapshot.chunks_indexed, 5);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let metrics = IngestMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.files_processed, 0);
        assert_eq!(snapshot.files_failed, 0);
        assert_eq!(snapshot.chunks_indexed, 0);
    }
}
