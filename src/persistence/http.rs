use super::{AttachmentUpload, PersistenceService};
use crate::error::{ApiError, ApiResult, WireError};
use crate::settings::ApiSettings;
use crate::wire::{Answer, AttachmentRef, Document, DocumentUpdate, NewDocument, Question};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Persistence service reached over HTTP.
#[derive(Clone)]
pub struct HttpPersistence {
    client: Client,
    base_url: String,
}

impl HttpPersistence {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> ApiResult<Self> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            error!(%url, status = status.as_u16(), "Persistence request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(WireError::Json(e)))
    }
}

#[async_trait::async_trait]
impl PersistenceService for HttpPersistence {
    async fn create_document(&self, initial: &NewDocument) -> ApiResult<Document> {
        debug!(title = %initial.title, "Creating document");
        let response = self
            .client
            .post(self.url("canvas/"))
            .json(initial)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_document(&self, id: &str) -> ApiResult<Document> {
        debug!(id, "Fetching document");
        let response = self.client.get(self.url(&format!("canvas/{id}"))).send().await?;
        Self::read_json(response).await
    }

    async fn update_document(&self, id: &str, update: &DocumentUpdate) -> ApiResult<Document> {
        debug!(id, elements = update.elements.len(), "Updating document");
        let response = self
            .client
            .put(self.url(&format!("canvas/{id}")))
            .json(update)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn upload_attachment(
        &self,
        document_id: &str,
        file: &AttachmentUpload,
    ) -> ApiResult<AttachmentRef> {
        debug!(document_id, file = %file.file_name, "Uploading attachment");
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new()
            .part("file", part)
            .text("title", file.title.clone())
            .text("canvas_id", document_id.to_string());

        let response = self
            .client
            .post(self.url("files"))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn ask_question(&self, question: &Question) -> ApiResult<Answer> {
        let response = self
            .client
            .post(self.url("qa/ask"))
            .json(question)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
