//! HTTP implementation of [`ChatBackend`]
//!
//! JSON for session management, multipart for anything carrying files.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{BackendError, BackendResult, ChatBackend};
use crate::config::BackendConfig;
use crate::core::attachments::AttachedFile;
use crate::core::types::{IndexSummary, IndexingResult, SessionDetail, SessionSummary};

#[derive(Deserialize)]
struct SessionsResponse {
    sessions: Vec<SessionSummary>,
}

#[derive(Deserialize)]
struct RenameResponse {
    session: SessionSummary,
}

#[derive(Deserialize)]
struct ReplyResponse {
    reply: String,
}

#[derive(Deserialize)]
struct IndexesResponse {
    indexes: Vec<IndexSummary>,
}

/// reqwest-backed client for the assistant server
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    health_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::Network(format!("invalid base url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Network(format!(
                "invalid base url {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with path segments appended (each segment percent-encoded)
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    async fn check(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            Err(BackendError::NotFound(body))
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Multipart form holding every file under `files`
    async fn files_form(mut form: Form, files: &[AttachedFile]) -> BackendResult<Form> {
        for file in files {
            let bytes = tokio::fs::read(&file.handle)
                .await
                .map_err(|e| BackendError::File {
                    path: file.handle.display().to_string(),
                    message: e.to_string(),
                })?;
            let mut part = Part::bytes(bytes).file_name(file.name.clone());
            if !file.mime_type.is_empty() {
                part = part
                    .mime_str(&file.mime_type)
                    .map_err(|e| BackendError::Decode(e.to_string()))?;
            }
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn check_health(&self) -> BackendResult<()> {
        let response = self
            .client
            .get(self.endpoint(&["health"]))
            .timeout(self.health_timeout)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn get_sessions(&self) -> BackendResult<Vec<SessionSummary>> {
        let response = self.client.get(self.endpoint(&["sessions"])).send().await?;
        let body: SessionsResponse = Self::read_json(response).await?;
        Ok(body.sessions)
    }

    async fn create_session(&self) -> BackendResult<SessionSummary> {
        let response = self
            .client
            .post(self.endpoint(&["sessions"]))
            .json(&json!({}))
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn get_session(&self, session_id: &str) -> BackendResult<SessionDetail> {
        let response = self
            .client
            .get(self.endpoint(&["sessions", session_id]))
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> BackendResult<SessionSummary> {
        let response = self
            .client
            .patch(self.endpoint(&["sessions", session_id]))
            .json(&json!({ "title": title }))
            .send()
            .await?;
        let body: RenameResponse = Self::read_json(response).await?;
        Ok(body.session)
    }

    async fn delete_session(&self, session_id: &str) -> BackendResult<()> {
        let response = self
            .client
            .delete(self.endpoint(&["sessions", session_id]))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn link_index_to_session(&self, session_id: &str, index_id: &str) -> BackendResult<()> {
        let response = self
            .client
            .post(self.endpoint(&["sessions", session_id, "index"]))
            .json(&json!({ "index_id": index_id }))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        attachments: &[AttachedFile],
    ) -> BackendResult<String> {
        let form = Form::new().text("message", text.to_string());
        let form = Self::files_form(form, attachments).await?;
        let response = self
            .client
            .post(self.endpoint(&["sessions", session_id, "messages"]))
            .multipart(form)
            .send()
            .await?;
        let body: ReplyResponse = Self::read_json(response).await?;
        Ok(body.reply)
    }

    async fn list_indexes(&self) -> BackendResult<Vec<IndexSummary>> {
        let response = self.client.get(self.endpoint(&["indexes"])).send().await?;
        let body: IndexesResponse = Self::read_json(response).await?;
        Ok(body.indexes)
    }

    async fn index_documents(
        &self,
        name: &str,
        files: &[AttachedFile],
    ) -> BackendResult<IndexingResult> {
        let form = Form::new().text("name", name.to_string());
        let form = Self::files_form(form, files).await?;
        let response = self
            .client
            .post(self.endpoint(&["indexes"]))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
