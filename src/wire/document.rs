//! Document-level wire shapes exchanged with the persistence service.

use crate::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_DOCUMENT_TITLE,
};
use crate::error::WireError;
use crate::wire::element::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A canvas document as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Raw element list, decoded by the scene adapter
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default)]
    pub files: Vec<AttachmentRef>,
    #[serde(default)]
    pub markdown_content: String,
}

fn default_width() -> u32 {
    DEFAULT_CANVAS_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_CANVAS_HEIGHT
}

fn default_background() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

impl Document {
    /// Parse a document, reporting malformed input as an error.
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, WireError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }
}

/// A file attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub elements: Vec<Value>,
}

impl Default for NewDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_DOCUMENT_TITLE.to_string(),
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            elements: Vec::new(),
        }
    }
}

/// Body of a full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentUpdate {
    pub title: String,
    pub elements: Vec<Value>,
    /// Base64-encoded rendered thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body of a question sent to the QA endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "fileIds", skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub answer: String,
}
