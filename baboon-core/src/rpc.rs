//! Minimal JSON-RPC 2.0 transport over HTTP.

use crate::contracts::decode_revert;
use crate::error::{BaboonError, Result, USER_REJECTED_CODE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    /// Revert payload, when the node attached one as a hex string.
    fn revert_data(&self) -> Option<Vec<u8>> {
        let raw = match self.data.as_ref()? {
            Value::String(s) => s.as_str(),
            Value::Object(obj) => obj.get("data")?.as_str()?,
            _ => return None,
        };
        hex::decode(raw.trim_start_matches("0x")).ok()
    }
}

impl From<RpcErrorObject> for BaboonError {
    fn from(err: RpcErrorObject) -> Self {
        if err.code == USER_REJECTED_CODE {
            return BaboonError::WalletRejected(err.message);
        }

        if let Some(name) = err.revert_data().as_deref().and_then(decode_revert) {
            return BaboonError::ContractRevert {
                reason: name.to_string(),
            };
        }

        if err.message.contains("execution reverted") {
            return BaboonError::ContractRevert {
                reason: err.message,
            };
        }

        BaboonError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BaboonError::config(format!(
                "Unsupported RPC endpoint '{}': expected http(s) URL",
                url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                BaboonError::network_connection(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            url,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        tracing::debug!("rpc -> {} #{} {}", self.url, id, method);

        let response = self.http.post(&self.url).json(&body).send().await?;
        let http_error = response.error_for_status_ref().err();
        let bytes = response.bytes().await?;

        // Wallets answer rejections with a 4xx and a JSON-RPC error body.
        let envelope = serde_json::from_slice::<RpcResponse>(&bytes);
        if let Some(err) = http_error {
            return match envelope {
                Ok(envelope) if envelope.error.is_some() => parse_response(method, envelope),
                _ => Err(err.into()),
            };
        }

        parse_response(method, envelope?)
    }
}

fn parse_response<T: DeserializeOwned>(method: &str, response: RpcResponse) -> Result<T> {
    if let Some(err) = response.error {
        tracing::debug!("rpc <- {} error {}: {}", method, err.code, err.message);
        return Err(err.into());
    }

    let result = response.result.unwrap_or(Value::Null);
    Ok(serde_json::from_value(result)?)
}
