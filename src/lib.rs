//! PDF footer removal library
//! Strips a fixed-height band from the bottom of every page of a PDF,
//! permanently removing the content underneath and painting an opaque
//! fill over the band.

// Configuration and errors
pub mod config;
pub mod error;

// Page geometry
pub mod geometry;

// Core redaction transform
pub mod redactor;

// Batch shell: per-file orchestration, session cache, metrics
pub mod processor;
pub mod session;

// Page preview rasterization (needs a PDFium shared library at runtime)
#[cfg(feature = "preview")]
pub mod preview;

// Shared utilities
pub mod utils;

// Re-exports for crate consumers
pub use config::{FillColor, PreviewConfig, ProcessingConfig, RedactionConfig};
pub use error::{DocumentOpenError, Error, PreviewError, RedactionError, Result};
pub use processor::{BatchProcessor, BatchSummary, DocumentProcessor, FileReport};
pub use redactor::{FooterRedactor, RedactionOutcome};
pub use session::{ProcessedFile, SessionStore};
pub use utils::Metrics;

#[cfg(feature = "preview")]
pub use preview::{PreviewImage, PreviewRenderer};
