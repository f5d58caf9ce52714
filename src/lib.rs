#![deny(missing_docs)]

//! Core library for the shelfscan ingestion worker.

/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// PDF text extraction.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Ingestion metrics helpers.
pub mod metrics;
/// Document processing pipeline utilities.
pub mod processing;
/// Qdrant vector store integration.
pub mod qdrant;
/// Upload records and the metadata-store seam.
pub mod uploads;
/// Batch scanner/runner over pending uploads.
pub mod worker;
