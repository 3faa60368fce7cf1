#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CATALOGIQ_API_URL: &str = "https://catalogiq.app/api/v1";
pub const DEFAULT_IMAGE_SIZE: &str = "800x800";

/// Everything one sync invocation needs to reach CatalogIQ, Odoo and the queue.
#[derive(Clone)]
pub struct SyncConfig {
    pub catalogiq_api_key: String,
    pub catalogiq_api_url: String,
    pub page_limit: u32,
    pub odoo_url: String,
    pub odoo_db: String,
    pub odoo_username: String,
    pub odoo_password: String,
    pub default_category_id: i64,
    pub image_size: String,
    pub image_timeout: Duration,
    pub request_timeout: Duration,
    pub queue_url: Option<String>,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("catalogiq_api_key", &"<redacted>")
            .field("catalogiq_api_url", &self.catalogiq_api_url)
            .field("page_limit", &self.page_limit)
            .field("odoo_url", &self.odoo_url)
            .field("odoo_db", &self.odoo_db)
            .field("odoo_username", &self.odoo_username)
            .field("odoo_password", &"<redacted>")
            .field("default_category_id", &self.default_category_id)
            .field("image_size", &self.image_size)
            .field("image_timeout", &self.image_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("queue_url", &self.queue_url)
            .finish()
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SyncError::MissingConfigError {
            field: key.to_string(),
        })
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SyncError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: "not a valid number".to_string(),
            }),
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source shaped like the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            catalogiq_api_key: required(&lookup, "CATALOGIQ_API_KEY")?,
            catalogiq_api_url: lookup("CATALOGIQ_API_URL")
                .unwrap_or_else(|| DEFAULT_CATALOGIQ_API_URL.to_string()),
            page_limit: parsed(&lookup, "CATALOGIQ_PAGE_LIMIT", 1)?,
            odoo_url: required(&lookup, "ODOO_URL")?,
            odoo_db: required(&lookup, "ODOO_DB")?,
            odoo_username: required(&lookup, "ODOO_USERNAME")?,
            odoo_password: required(&lookup, "ODOO_PASSWORD")?,
            default_category_id: parsed(&lookup, "ODOO_DEFAULT_CATEGORY_ID", 1)?,
            image_size: lookup("IMAGE_SIZE").unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            image_timeout: Duration::from_secs(parsed(&lookup, "IMAGE_TIMEOUT_SECONDS", 5)?),
            request_timeout: Duration::from_secs(parsed(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?),
            queue_url: lookup("SYNC_QUEUE_URL").filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlFile = toml::from_str(content)?;
        Ok(file.into())
    }
}

#[derive(Debug, Deserialize)]
struct TomlFile {
    catalogiq: TomlCatalogIq,
    odoo: TomlOdoo,
    #[serde(default)]
    images: TomlImages,
    request_timeout_seconds: Option<u64>,
    queue_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogIq {
    api_key: String,
    api_url: Option<String>,
    page_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TomlOdoo {
    url: String,
    db: String,
    username: String,
    password: String,
    default_category_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlImages {
    size: Option<String>,
    timeout_seconds: Option<u64>,
}

impl From<TomlFile> for SyncConfig {
    fn from(file: TomlFile) -> Self {
        Self {
            catalogiq_api_key: file.catalogiq.api_key,
            catalogiq_api_url: file
                .catalogiq
                .api_url
                .unwrap_or_else(|| DEFAULT_CATALOGIQ_API_URL.to_string()),
            page_limit: file.catalogiq.page_limit.unwrap_or(1),
            odoo_url: file.odoo.url,
            odoo_db: file.odoo.db,
            odoo_username: file.odoo.username,
            odoo_password: file.odoo.password,
            default_category_id: file.odoo.default_category_id.unwrap_or(1),
            image_size: file
                .images
                .size
                .unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            image_timeout: Duration::from_secs(file.images.timeout_seconds.unwrap_or(5)),
            request_timeout: Duration::from_secs(file.request_timeout_seconds.unwrap_or(30)),
            queue_url: file.queue_url,
        }
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_secret("catalogiq_api_key", &self.catalogiq_api_key)?;
        validation::validate_url("catalogiq_api_url", &self.catalogiq_api_url)?;
        validation::validate_range("page_limit", self.page_limit, 1, 100)?;

        validation::validate_url("odoo_url", &self.odoo_url)?;
        validation::validate_non_empty_string("odoo_db", &self.odoo_db)?;
        validation::validate_non_empty_string("odoo_username", &self.odoo_username)?;
        validation::validate_secret("odoo_password", &self.odoo_password)?;
        validation::validate_range("default_category_id", self.default_category_id, 1, i64::MAX)?;

        validation::validate_image_size("image_size", &self.image_size)?;
        validation::validate_range("image_timeout_seconds", self.image_timeout.as_secs(), 1, 300)?;
        validation::validate_range(
            "request_timeout_seconds",
            self.request_timeout.as_secs(),
            1,
            900,
        )?;

        if let Some(queue_url) = &self.queue_url {
            validation::validate_url("queue_url", queue_url)?;
        }

        tracing::debug!("✅ Sync configuration validation passed");
        Ok(())
    }
}

impl ConfigProvider for SyncConfig {
    fn page_limit(&self) -> u32 {
        self.page_limit
    }

    fn image_size(&self) -> &str {
        &self.image_size
    }

    fn default_category_id(&self) -> i64 {
        self.default_category_id
    }
}
