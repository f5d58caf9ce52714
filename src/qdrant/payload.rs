//! Helpers for constructing Qdrant point payloads.

use crate::qdrant::types::PointInsert;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

/// Build the payload object stored alongside one indexed chunk.
pub(crate) fn build_payload(point: &PointInsert, timestamp_rfc3339: &str) -> Value {
    let mut payload = Map::new();
    payload.insert("text".into(), Value::String(point.text.clone()));
    payload.insert("owner_id".into(), Value::String(point.owner_id.clone()));
    payload.insert("file_name".into(), Value::String(point.file_name.clone()));
    payload.insert("chunk_index".into(), Value::from(point.chunk_index));
    payload.insert("source".into(), Value::String(point.source.clone()));
    payload.insert(
        "indexed_at".into(),
        Value::String(timestamp_rfc3339.to_string()),
    );
    Value::Object(payload)
}

/// Current timestamp formatted for payload storage.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Construct an identifier suitable for Qdrant points.
pub(crate) fn generate_point_id() -> String {
    Uuid::new_v4().to_string()
}
