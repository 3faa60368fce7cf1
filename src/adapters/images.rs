use crate::domain::ports::ImageFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use std::time::Duration;

/// Downloads product images so they can be embedded in Odoo records.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_base64(&self, url: &str) -> Option<String> {
        match self.download(url).await {
            Ok(bytes) if bytes.is_empty() => {
                tracing::warn!("Image at {} is empty, skipping", url);
                None
            }
            Ok(bytes) => {
                tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
                Some(STANDARD.encode(bytes))
            }
            Err(e) => {
                tracing::warn!("Error downloading image {}: {}", url, e);
                None
            }
        }
    }
}
