//! Qdrant vector store integration.

mod client;
mod payload;
mod types;

pub use client::QdrantService;
pub use types::{PointInsert, QdrantError, ScoredPoint};
