//! Error types for the document ingestion pipeline.

use thiserror::Error;

/// Error types that can occur while turning a document into chunks.
///
/// Extraction backends, privacy detectors, and the normalizer all report
/// through this enum; the pipeline decides per stage whether an error is
/// fatal for the document or degrades to a partial result.
#[derive(Error, Debug)]
pub enum PrepError {
    /// File I/O error (missing input, unreadable output folder, ...).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error while persisting chunk output.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown extension or a format whose library is unavailable.
    #[error("Format error: {0}")]
    FormatError(String),

    /// A format backend failed while parsing an otherwise supported file.
    #[error("Backend error: {0}")]
    BackendError(String),

    /// OCR engine missing or failed during recognition.
    #[error("OCR error: {0}")]
    OcrError(String),

    /// A detection or correction model failed at inference time.
    #[error("Model error: {0}")]
    ModelError(String),

    /// Wrapped error from a format-specific parser.
    #[error("Parser error: {0}")]
    ParserError(#[from] anyhow::Error),
}

/// Type alias for [`Result<T, PrepError>`].
pub type Result<T> = std::result::Result<T, PrepError>;
