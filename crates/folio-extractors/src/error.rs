//! Extraction error types.

use thiserror::Error;

/// Errors that can occur while turning a stored file into text.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No strategy produced a result.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Transport-level failure talking to the vision API or blob storage.
    #[error("Network error: {0}")]
    Network(String),

    /// The vision API answered with an error (quota, malformed input, ...).
    #[error("Vision API error: {0}")]
    Vision(String),

    /// Requested object does not exist in blob storage.
    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    /// Image could not be decoded or re-encoded during preprocessing.
    #[error("Image preprocessing failed: {0}")]
    Preprocess(String),

    /// Local OCR engine failure.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Network(err.to_string())
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
