//! Error types for the canvas core.
//!
//! One enum per concern: wire parsing, the persistence service, the document
//! session and the settings file.

use thiserror::Error;

/// Errors raised while parsing wire documents or element lists
#[derive(Error, Debug)]
pub enum WireError {
    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by a persistence service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(#[from] WireError),

    /// Local file could not be read for upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Whether the failure was a refused local file access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ApiError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Errors raised by a canvas session
#[derive(Error, Debug)]
pub enum SessionError {
    /// A load for the same document has not finished yet
    #[error("Document {0} is already loading")]
    LoadInFlight(String),

    /// Operation needs an open document
    #[error("No document is open")]
    NoDocument,

    /// The open document has edits that were neither saved nor discarded
    #[error("The open canvas has unsaved changes")]
    UnsavedChanges,

    /// An exit decision or alert is waiting for the user
    #[error("Waiting for the user to answer a prompt")]
    ModalPending,

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image header could not be read
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised while reading or writing the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for persistence calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
