use crate::config::SyncConfig;
use crate::domain::model::ProductPage;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;

const API_KEY_HEADER: &str = "Catalogiq-Api-Key";

/// Read-only client for the CatalogIQ products listing.
pub struct CatalogIqClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl CatalogIqClient {
    pub fn new(client: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(client: Client, config: &SyncConfig) -> Self {
        Self::new(
            client,
            config.catalogiq_api_url.clone(),
            config.catalogiq_api_key.clone(),
        )
    }
}

#[async_trait]
impl CatalogSource for CatalogIqClient {
    async fn fetch_page(&self, offset: u64, limit: u32) -> Result<ProductPage> {
        let url = format!("{}/products", self.api_url);
        tracing::debug!("Fetching {} (offset={}, limit={})", url, offset, limit);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("offset", offset), ("limit", u64::from(limit))])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("CatalogIQ response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::SourceApiError {
                status: status.as_u16(),
                body,
            });
        }

        let page: ProductPage = response.json().await?;
        tracing::info!(
            "📦 Fetched {} product(s) at offset {}",
            page.results.len(),
            offset
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_page_sends_offset_limit_and_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/products")
                .query_param("offset", "12")
                .query_param("limit", "1")
                .header("catalogiq-api-key", "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "count": 40,
                    "results": [{"name": "Canvas Tote", "default_code": "TOTE-1", "price": "24.00"}]
                }));
        });

        let client = CatalogIqClient::new(Client::new(), server.url("/api/v1/"), "test-key");
        let page = client.fetch_page(12, 1).await.unwrap();

        api_mock.assert();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "Canvas Tote");
        assert_eq!(page.results[0].default_code.as_deref(), Some("TOTE-1"));
        assert_eq!(page.results[0].price, Some(24.0));
    }

    #[tokio::test]
    async fn test_fetch_page_missing_results_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = CatalogIqClient::new(Client::new(), server.base_url(), "k");
        let page = client.fetch_page(0, 1).await.unwrap();
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(403).body("invalid api key");
        });

        let client = CatalogIqClient::new(Client::new(), server.base_url(), "bad");
        match client.fetch_page(0, 1).await {
            Err(SyncError::SourceApiError { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected SourceApiError, got {:?}", other),
        }
    }
}
