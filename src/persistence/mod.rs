//! Contract of the remote scene persistence service.
//!
//! ## Modules
//!
//! - `http` - `reqwest` implementation against the REST API

mod http;

pub use http::HttpPersistence;

use crate::error::ApiResult;
use crate::wire::{Answer, AttachmentRef, Document, DocumentUpdate, NewDocument, Question};
use std::path::Path;

/// A file to attach to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub title: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Read a file from disk; the file name doubles as the title.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let mime_type = mime_for(path).to_string();
        Ok(Self {
            title: file_name.clone(),
            file_name,
            mime_type,
            bytes,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("md" | "markdown") => "text/markdown",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[async_trait::async_trait]
pub trait PersistenceService: Send + Sync {
    /// Create a document (POST `/canvas/`).
    async fn create_document(&self, initial: &NewDocument) -> ApiResult<Document>;

    /// Fetch a document (GET `/canvas/{id}`).
    async fn get_document(&self, id: &str) -> ApiResult<Document>;

    /// Replace a document's title and elements (PUT `/canvas/{id}`).
    async fn update_document(&self, id: &str, update: &DocumentUpdate) -> ApiResult<Document>;

    /// Upload a file attached to a document (POST `/files`).
    async fn upload_attachment(
        &self,
        document_id: &str,
        file: &AttachmentUpload,
    ) -> ApiResult<AttachmentRef>;

    /// Ask the QA endpoint about a document's files (POST `/qa/ask`).
    async fn ask_question(&self, question: &Question) -> ApiResult<Answer>;
}
