use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CatalogIQ API returned {status}: {body}")]
    SourceApiError { status: u16, body: String },

    #[error("Odoo RPC call {model}.{method} failed: {message}")]
    RpcError {
        model: String,
        method: String,
        message: String,
    },

    #[error("Odoo authentication failed for user '{username}' on database '{db}'")]
    AuthError { db: String, username: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid queue message: {message}")]
    MessageError { message: String },

    #[error("Failed to publish next offset {offset}: {message}")]
    PublishError { offset: u64, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SyncError::HttpError(_) | SyncError::SourceApiError { .. } => ErrorSeverity::Medium,
            SyncError::PublishError { .. } => ErrorSeverity::Medium,
            SyncError::RpcError { .. }
            | SyncError::SerializationError(_)
            | SyncError::DecodeError(_)
            | SyncError::MessageError { .. } => ErrorSeverity::High,
            SyncError::AuthError { .. }
            | SyncError::TomlError(_)
            | SyncError::IoError(_)
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::HttpError(_) => "Check network connectivity to CatalogIQ and Odoo",
            SyncError::SourceApiError { status: 401 | 403, .. } => {
                "Check that CATALOGIQ_API_KEY is valid"
            }
            SyncError::SourceApiError { .. } => "Retry the offset later",
            SyncError::RpcError { .. } => {
                "Check that XML/JSON-RPC is enabled and the Odoo user has API access"
            }
            SyncError::AuthError { .. } => "Check ODOO_DB, ODOO_USERNAME and ODOO_PASSWORD",
            SyncError::SerializationError(_) | SyncError::DecodeError(_) => {
                "Inspect the response payload for unexpected fields"
            }
            SyncError::TomlError(_) | SyncError::IoError(_) => "Check the config file path and syntax",
            SyncError::MissingConfigError { .. } | SyncError::InvalidConfigValueError { .. } => {
                "Set the missing or invalid configuration value"
            }
            SyncError::MessageError { .. } => "Send a message shaped like {\"offset\": 0}",
            SyncError::PublishError { .. } => "Check SYNC_QUEUE_URL and queue permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
