use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{AnalysisAccepted, AnalysisRecord, MetricsSummary};

mod error;
mod retry;
mod source;

pub use error::ApiError;
pub use retry::RetryConfig;
pub use source::RecordSource;

/// HTTP client for the fitness analysis service
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_retry_config(config, RetryConfig::with_max_attempts(config.max_attempts))
    }

    /// Create a new API client with custom retry configuration
    pub fn with_retry_config(config: &ApiConfig, retry_config: RetryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document, retrying transport and server failures
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        self.retry_config
            .execute(|| async {
                tracing::debug!("GET {}", url);

                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status.is_success() {
                    Ok(response.json::<T>().await?)
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(ApiError::from_status(status, &body))
                }
            })
            .await
    }

    /// Upload an image for analysis. Not retried: the service stores a record per upload.
    pub async fn submit_image(&self, path: &Path) -> Result<AnalysisAccepted> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))
            .context("Invalid image content type")?;
        let form = Form::new().part("image", part);

        let url = format!("{}/api/analyze", self.base_url);
        tracing::info!("Submitting {} for analysis", path.display());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();

        if status.is_success() {
            let accepted: AnalysisAccepted = response.json().await.map_err(ApiError::from)?;
            tracing::info!("Analysis stored as record {}", accepted.id);
            Ok(accepted)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_history_list(&self) -> Result<Vec<AnalysisRecord>, ApiError> {
        self.get_json("/api/history").await
    }

    async fn fetch_record(&self, id: i64) -> Result<AnalysisRecord, ApiError> {
        self.get_json(&format!("/api/history/{}", id)).await
    }

    async fn fetch_metrics_summary(&self) -> Result<MetricsSummary, ApiError> {
        self.get_json("/api/metrics/summary").await
    }
}

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
