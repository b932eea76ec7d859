//! Error types and handling for the footer redaction library

use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Custom result type for redaction operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type for redaction operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Document open error: {0}")]
    DocumentOpenError(#[from] DocumentOpenError),

    #[error("Redaction error: {0}")]
    RedactionError(#[from] RedactionError),

    #[error("Preview error: {0}")]
    PreviewError(#[from] PreviewError),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

// -------------------- Sub-Error Categories --------------------

/// Input bytes could not be opened as a PDF document.
///
/// Surfaced before any page is touched; no partial output exists when
/// one of these is returned.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentOpenError {
    #[error("Input is empty")]
    Empty,

    #[error("Not a parseable PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("Document is encrypted and cannot be processed")]
    Encrypted,

    #[error("Document has no pages")]
    NoPages,
}

/// A page's redaction could not be committed.
///
/// Policy is strict abort: the whole document fails rather than shipping
/// with an unredacted page.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactionError {
    #[error("Page {page} not found in document")]
    PageLookup { page: u32 },

    #[error("Page {page} has no resolvable media box")]
    MissingMediaBox { page: u32 },

    #[error("Page {page} content stream could not be read: {reason}")]
    ContentRead { page: u32, reason: String },

    #[error("Page {page} content stream could not be decoded: {reason}")]
    ContentDecode { page: u32, reason: String },

    #[error("Page {page} content stream could not be re-encoded: {reason}")]
    ContentEncode { page: u32, reason: String },

    #[error("Page {page} redaction could not be written back: {reason}")]
    ContentWrite { page: u32, reason: String },

    #[error("Failed to serialize redacted document: {0}")]
    Serialize(String),
}

/// Preview rasterization failure.
///
/// Previews are best-effort; these never abort the redaction result.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PreviewError {
    #[error("PDF rendering library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("Failed to open rendered document: {0}")]
    Open(String),

    #[error("Page {page} could not be rasterized: {reason}")]
    Render { page: usize, reason: String },

    #[error("Preview image could not be encoded: {0}")]
    ImageEncode(String),
}
