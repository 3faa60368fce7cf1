use crate::config::SyncConfig;
use crate::domain::ports::OdooRpc;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    message: String,
    #[serde(default)]
    data: Option<RpcFaultData>,
}

#[derive(Debug, Deserialize)]
struct RpcFaultData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RpcFault {
    fn describe(&self) -> String {
        match &self.data {
            Some(RpcFaultData {
                name: Some(name),
                message: Some(message),
            }) => format!("{} ({}: {})", self.message, name, message),
            Some(RpcFaultData {
                message: Some(message),
                ..
            }) => format!("{}: {}", self.message, message),
            _ => self.message.clone(),
        }
    }
}

/// Authenticated session against Odoo's `/jsonrpc` endpoint.
///
/// Authentication happens once in [`OdooClient::connect`]; every later call
/// goes through `object.execute_kw` with the resulting uid.
pub struct OdooClient {
    client: Client,
    endpoint: String,
    db: String,
    uid: i64,
    password: String,
    request_id: AtomicU64,
}

impl OdooClient {
    pub async fn connect(
        client: Client,
        url: &str,
        db: &str,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let endpoint = format!("{}/jsonrpc", url.trim_end_matches('/'));
        let request_id = AtomicU64::new(1);

        let result = call(
            &client,
            &endpoint,
            &request_id,
            ("common", "authenticate"),
            json!({
                "service": "common",
                "method": "authenticate",
                "args": [db, username, password, {}],
            }),
        )
        .await?;

        let uid = result.as_i64().ok_or_else(|| SyncError::AuthError {
            db: db.to_string(),
            username: username.to_string(),
        })?;
        tracing::info!("🔐 Authenticated with Odoo as uid {}", uid);

        Ok(Self {
            client,
            endpoint,
            db: db.to_string(),
            uid,
            password: password.to_string(),
            request_id,
        })
    }

    pub async fn from_config(client: Client, config: &SyncConfig) -> Result<Self> {
        Self::connect(
            client,
            &config.odoo_url,
            &config.odoo_db,
            &config.odoo_username,
            &config.odoo_password,
        )
        .await
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }
}

async fn call(
    client: &Client,
    endpoint: &str,
    request_id: &AtomicU64,
    (model, method): (&str, &str),
    params: Value,
) -> Result<Value> {
    let id = request_id.fetch_add(1, Ordering::Relaxed);
    let body = json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": params,
        "id": id,
    });

    let response = client
        .post(endpoint)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;
    let response: RpcResponse = response.json().await?;

    if let Some(fault) = response.error {
        return Err(SyncError::RpcError {
            model: model.to_string(),
            method: method.to_string(),
            message: fault.describe(),
        });
    }

    Ok(response.result.unwrap_or(Value::Null))
}

#[async_trait]
impl OdooRpc for OdooClient {
    async fn execute_kw(&self, model: &str, method: &str, args: Value) -> Result<Value> {
        tracing::debug!("Odoo {}.{} {}", model, method, args);
        call(
            &self.client,
            &self.endpoint,
            &self.request_id,
            (model, method),
            json!({
                "service": "object",
                "method": "execute_kw",
                "args": [self.db, self.uid, self.password, model, method, args],
            }),
        )
        .await
    }
}
