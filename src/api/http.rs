//! reqwest-backed [`StorageApi`] implementation.

use super::model::{CreatedFolder, FolderContents, Health, NewFolder, UploadFile, UploadedFile};
use super::{wire, StorageApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{FileId, FolderId};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed-count retry with linear backoff, applied to idempotent requests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub attempts: u32,
    /// Delay before retry `n` is `backoff * n`
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(250))
    }
}

/// HTTP client for a ByteBucket server.
pub struct HttpStorageClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpStorageClient {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::ConfigError(format!(
                "Invalid API base URL: {} (must start with http:// or https://)",
                base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .default_headers(default_headers)
            .user_agent(concat!("bytebucket/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs.max(1)),
            RetryPolicy::new(config.retries, Duration::from_millis(config.retry_backoff_ms)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run `op` until it succeeds, fails with a final error, or attempts run out.
    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        request = what,
                        attempt,
                        max_attempts = self.retry.attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Turn a non-2xx response into [`ApiError::StatusError`] with the server's message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
    let body = response.bytes().await.unwrap_or_default();
    Err(ApiError::StatusError {
        status: status.as_u16(),
        message: wire::error_message(status.as_u16(), &reason, &body),
    })
}

/// Listing path for a folder key.
pub fn folder_path(folder_id: Option<FolderId>) -> String {
    match folder_id {
        Some(id) => format!("/folder/{}", id),
        None => "/folder".to_string(),
    }
}

pub fn download_path(file_id: FileId) -> String {
    format!("/download/{}", file_id)
}

#[async_trait]
impl StorageApi for HttpStorageClient {
    async fn folder_contents(
        &self,
        folder_id: Option<FolderId>,
    ) -> Result<FolderContents, ApiError> {
        let path = folder_path(folder_id);
        debug!(path = %path, "Fetching folder contents");
        let path = path.as_str();
        let body = self
            .with_retry("folder_contents", move || self.get_bytes(path))
            .await?;
        wire::decode_folder_contents(&body, folder_id)
    }

    async fn create_folder(&self, request: &NewFolder) -> Result<CreatedFolder, ApiError> {
        let response = self
            .client
            .post(self.url("/folder"))
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let created = wire::decode_created_folder(&body)?;
        info!(folder_id = %created.id, name = %created.name, "Folder created");
        Ok(created)
    }

    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        folder_id: Option<FolderId>,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        if files.is_empty() {
            return Err(ApiError::InvalidInput("No files to upload".to_string()));
        }
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.content_type)
                .map_err(|e| {
                    ApiError::InvalidInput(format!(
                        "Invalid content type {}: {}",
                        file.content_type, e
                    ))
                })?;
            form = form.part("files", part);
        }
        if let Some(id) = folder_id {
            form = form.text("folder_id", id.to_string());
        }

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let uploaded = wire::decode_uploaded_files(&body)?;
        info!(
            requested = count,
            stored = uploaded.len(),
            folder_id = ?folder_id,
            "Files uploaded"
        );
        Ok(uploaded)
    }

    async fn download_file(&self, file_id: FileId) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&download_path(file_id));
        let url = url.as_str();
        let client = &self.client;
        self.with_retry("download_file", move || async move {
            let response = client.get(url).send().await?;
            let response = check_status(response).await?;
            let mut stream = response.bytes_stream();
            let mut bytes = Vec::new();
            while let Some(chunk) = stream.next().await {
                bytes.extend_from_slice(&chunk?);
            }
            debug!(file_id = %file_id, size = bytes.len(), "Download complete");
            Ok::<Vec<u8>, ApiError>(bytes)
        })
        .await
    }

    async fn health(&self) -> Result<Health, ApiError> {
        let body = self
            .with_retry("health", move || self.get_bytes("/health"))
            .await?;
        wire::decode_health(&body)
    }

    async fn banner(&self) -> Result<String, ApiError> {
        let url = self.url("/");
        let url = url.as_str();
        let client = &self.client;
        let body = self
            .with_retry("banner", move || async move {
                let response = client.get(url).header(ACCEPT, "text/plain").send().await?;
                let response = check_status(response).await?;
                Ok::<String, ApiError>(response.text().await?)
            })
            .await?;
        Ok(body.trim().to_string())
    }
}
