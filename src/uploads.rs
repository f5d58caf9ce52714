//! Upload records and the metadata-store seam.
//!
//! The relational backend that owns user and book rows lives outside this worker. The worker
//! only needs the upload ledger: which files exist, who owns them, and whether they have been
//! ingested yet. [`UploadStore`] captures that contract so the pipeline can be wired to any
//! backend; [`MemoryUploadStore`] is the in-process implementation used by the CLI and tests.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;
use walkdir::WalkDir;

/// Lifecycle state of an uploaded file with respect to ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// Accepted for storage, not yet ingested.
    Pending,
    /// All chunks durably written to the vector store.
    Processed,
}

impl UploadStatus {
    /// Stable string form used in logs and stored metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded file tracked by the metadata store.
///
/// The `(owner_id, file_name)` pair is unique; the worker addresses uploads by that pair and
/// never deletes records.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    /// Opaque unique identifier.
    pub id: Uuid,
    /// Identifier of the user who uploaded the file.
    pub owner_id: String,
    /// File name as uploaded, unique per owner.
    pub file_name: String,
    /// Storage path recorded when the file was accepted.
    pub file_path: String,
    /// Current ingestion state.
    pub status: UploadStatus,
    /// When the upload was accepted.
    pub created_at: OffsetDateTime,
}

impl UploadRecord {
    /// Build a fresh record in the `pending` state.
    pub fn pending(owner_id: &str, file_name: &str, file_path: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            file_name: file_name.to_string(),
            file_path: file_path.to_string(),
            status: UploadStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Errors raised by metadata-store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An upload with the same `(owner_id, file_name)` pair already exists.
    #[error("upload '{file_name}' already exists for owner '{owner_id}'")]
    Duplicate {
        /// Owner of the conflicting upload.
        owner_id: String,
        /// File name of the conflicting upload.
        file_name: String,
    },
    /// The backing store could not be reached or answered with an error.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Query/update contract the pipeline and runner consume.
///
/// Implementations must preserve a stable listing order; the batch runner processes files in
/// the order `list_pending` returns them.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Return all pending uploads, optionally scoped to one owner.
    async fn list_pending(&self, owner_id: Option<&str>) -> Result<Vec<UploadRecord>, StoreError>;

    /// Look up a single upload by its `(owner_id, file_name)` pair.
    async fn get(
        &self,
        owner_id: &str,
        file_name: &str,
    ) -> Result<Option<UploadRecord>, StoreError>;

    /// Look up a single upload by its opaque identifier.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<UploadRecord>, StoreError>;

    /// Update the status of an upload. A missing record is a no-op.
    async fn update_status(
        &self,
        owner_id: &str,
        file_name: &str,
        status: UploadStatus,
    ) -> Result<(), StoreError>;

    /// Insert a new record, enforcing the `(owner_id, file_name)` uniqueness constraint.
    async fn insert(&self, record: UploadRecord) -> Result<(), StoreError>;
}

/// In-process upload ledger keeping records in insertion order.
#[derive(Default)]
pub struct MemoryUploadStore {
    records: RwLock<Vec<UploadRecord>>,
}

impl MemoryUploadStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every file found under `<root>/<owner_id>/<file_name>` as a pending upload.
    ///
    /// Files already present in the store keep their current status. Unreadable directory
    /// entries are logged and skipped. Returns the number of records added.
    pub async fn seed_from_dir(&self, root: &Path) -> usize {
        let mut added = 0;
        for entry in WalkDir::new(root).min_depth(2).max_depth(2) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping unreadable uploads entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(owner_id) = entry
                .path()
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
            else {
                continue;
            };
            let Some(file_name) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non-UTF-8 file name");
                continue;
            };
            let record =
                UploadRecord::pending(owner_id, file_name, &entry.path().display().to_string());
            match self.insert(record).await {
                Ok(()) => added += 1,
                Err(StoreError::Duplicate { .. }) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to register upload");
                }
            }
        }
        added
    }
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn list_pending(&self, owner_id: Option<&str>) -> Result<Vec<UploadRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.status == UploadStatus::Pending)
            .filter(|record| owner_id.is_none_or(|owner| record.owner_id == owner))
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        owner_id: &str,
        file_name: &str,
    ) -> Result<Option<UploadRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.owner_id == owner_id && record.file_name == file_name)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<UploadRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn update_status(
        &self,
        owner_id: &str,
        file_name: &str,
        status: UploadStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if let Some(record) = records
            .iter_mut()
            .find(|record| record.owner_id == owner_id && record.file_name == file_name)
        {
            record.status = status;
        }
        Ok(())
    }

    async fn insert(&self, record: UploadRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|existing| {
                existing.owner_id == record.owner_id && existing.file_name == record.file_name
            })
        {
            return Err(StoreError::Duplicate {
                owner_id: record.owner_id,
                file_name: record.file_name,
            });
        }
        records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_rejects_duplicate_owner_file_pair() {
        let store = MemoryUploadStore::new();
        store
            .insert(UploadRecord::pending("u1", "a.pdf", "uploads/u1/a.pdf"))
            .await
            .expect("first insert");

        let err = store
            .insert(UploadRecord::pending("u1", "a.pdf", "uploads/u1/a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // A different owner may reuse the same file name.
        store
            .insert(UploadRecord::pending("u2", "a.pdf", "uploads/u2/a.pdf"))
            .await
            .expect("other owner insert");
    }

    #[tokio::test]
    async fn list_pending_filters_by_owner_and_status() {
        let store = MemoryUploadStore::new();
        store
            .insert(UploadRecord::pending("u1", "a.pdf", "uploads/u1/a.pdf"))
            .await
            .unwrap();
        store
            .insert(UploadRecord::pending("u2", "b.pdf", "uploads/u2/b.pdf"))
            .await
            .unwrap();
        store
            .insert(UploadRecord::pending("u1", "c.pdf", "uploads/u1/c.pdf"))
            .await
            .unwrap();
        store
            .update_status("u1", "a.pdf", UploadStatus::Processed)
            .await
            .unwrap();

        let all = store.list_pending(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|record| record.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.pdf", "c.pdf"]);

        let scoped = store.list_pending(Some("u1")).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].file_name, "c.pdf");
    }

    #[tokio::test]
    async fn list_pending_preserves_insertion_order() {
        let store = MemoryUploadStore::new();
        for name in ["one.pdf", "two.pdf", "three.pdf"] {
            store
                .insert(UploadRecord::pending("u1", name, "uploads/u1"))
                .await
                .unwrap();
        }

        let pending = store.list_pending(Some("u1")).await.unwrap();
        let names: Vec<&str> = pending
            .iter()
            .map(|record| record.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["one.pdf", "two.pdf", "three.pdf"]);
    }

    #[test]
    fn status_has_stable_string_form() {
        assert_eq!(UploadStatus::Pending.to_string(), "pending");
        assert_eq!(UploadStatus::Processed.as_str(), "processed");
    }

    #[tokio::test]
    async fn get_by_id_resolves_record() {
        let store = MemoryUploadStore::new();
        let record = UploadRecord::pending("u1", "a.pdf", "uploads/u1/a.pdf");
        let id = record.id;
        store.insert(record).await.unwrap();

        let found = store.get_by_id(id).await.unwrap().expect("record by id");
        assert_eq!(found.file_name, "a.pdf");
        assert!(store.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_status_is_noop_for_missing_record() {
        let store = MemoryUploadStore::new();
        store
            .update_status("ghost", "a.pdf", UploadStatus::Processed)
            .await
            .expect("update on missing record");
        assert!(store.get("ghost", "a.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seed_from_dir_registers_owner_scoped_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let owner = dir.path().join("u1");
        std::fs::create_dir_all(&owner).unwrap();
        std::fs::write(owner.join("a.pdf"), b"%PDF").unwrap();
        std::fs::write(owner.join("b.pdf"), b"%PDF").unwrap();
        // Files directly under the root have no owner segment and are ignored.
        std::fs::write(dir.path().join("stray.pdf"), b"%PDF").unwrap();

        let store = MemoryUploadStore::new();
        let added = store.seed_from_dir(dir.path()).await;
        assert_eq!(added, 2);

        let pending = store.list_pending(Some("u1")).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|record| record.status == UploadStatus::Pending));

        // Re-seeding must not duplicate records.
        let added_again = store.seed_from_dir(dir.path()).await;
        assert_eq!(added_again, 0);
    }
}
