use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Metadata the external source holds for one video reference.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub subject: String,
    pub duration_seconds: Option<i32>,
}

/// The collaborator the importer fetches from. A trait seam so tests can
/// substitute a canned source.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// `Ok(None)` when the source does not know the reference; `Err` when
    /// the source itself is unavailable.
    async fn fetch_video_metadata(&self, external_id: &str) -> Result<Option<VideoMetadata>>;
}

#[derive(Clone)]
pub struct HttpMetadataClient {
    client: Client,
    base_url: String,
}

impl HttpMetadataClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Reuses a shared HTTP client for connection pooling.
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataClient {
    async fn fetch_video_metadata(&self, external_id: &str) -> Result<Option<VideoMetadata>> {
        let url = format!("{}/videos/{}", self.base_url.trim_end_matches('/'), external_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Metadata source error: {} - {}",
                status,
                body
            ));
        }

        let metadata: VideoMetadata = response.json().await?;
        Ok(Some(metadata))
    }
}
