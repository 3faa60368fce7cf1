use crate::domain::model::{LoadOutcome, Product, ProductPage};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use serde_json::{json, Value};

pub trait ConfigProvider: Send + Sync {
    fn page_limit(&self) -> u32;
    fn image_size(&self) -> &str;
    fn default_category_id(&self) -> i64;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, offset: u64, limit: u32) -> Result<ProductPage>;
}

/// Remote-procedure access to Odoo models.
#[async_trait]
pub trait OdooRpc: Send + Sync {
    async fn execute_kw(&self, model: &str, method: &str, args: Value) -> Result<Value>;

    async fn search(&self, model: &str, domain: Value) -> Result<Vec<i64>> {
        let result = self.execute_kw(model, "search", json!([domain])).await?;
        serde_json::from_value(result).map_err(|e| SyncError::RpcError {
            model: model.to_string(),
            method: "search".to_string(),
            message: format!("expected a list of ids: {}", e),
        })
    }

    async fn create(&self, model: &str, values: Value) -> Result<i64> {
        let result = self.execute_kw(model, "create", json!([values])).await?;
        // Odoo 17+ returns a list even for a single record.
        let id = match &result {
            Value::Array(ids) => ids.first().and_then(Value::as_i64),
            other => other.as_i64(),
        };
        id.ok_or_else(|| SyncError::RpcError {
            model: model.to_string(),
            method: "create".to_string(),
            message: format!("expected a record id, got {}", result),
        })
    }

    async fn write(&self, model: &str, ids: &[i64], values: Value) -> Result<()> {
        self.execute_kw(model, "write", json!([ids, values])).await?;
        Ok(())
    }
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads an image and returns it base64 encoded, or `None` when the
    /// download fails for any reason.
    async fn fetch_base64(&self, url: &str) -> Option<String>;
}

#[async_trait]
pub trait OffsetPublisher: Send + Sync {
    async fn publish(&self, offset: u64) -> Result<()>;
}

/// The three steps of one sync run: fetch a page, write each product, hand
/// the next offset on.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, offset: u64) -> Result<Vec<Product>>;
    async fn load(&self, product: &Product) -> Result<LoadOutcome>;
    async fn publish_next(&self, offset: u64) -> Result<()>;
}
