//! JSON-RPC 2.0 transport bound to a single node endpoint.
//!
//! One envelope shape in, one out: callers hand over a method name and
//! positional params and get the decoded `result` back. Node-reported
//! error objects surface as [`Error::Rpc`]; everything else that goes
//! wrong on the wire is [`Error::Transport`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC transport with per-request correlation ids.
#[derive(Debug)]
pub struct RpcTransport {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl RpcTransport {
    /// Build a transport for `endpoint` with a per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one request and decode its `result` into the expected type.
    ///
    /// A missing or null `result` decodes into `Option::None` when the
    /// caller asks for an `Option`; for any other type it is a transport
    /// error.
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        tracing::debug!(method = method, id = request.id, "Sending RPC request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Transport(format!("RPC request timed out: {}", e))
                } else {
                    Error::Transport(format!("RPC request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "RPC endpoint returned status {}",
                status
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Malformed RPC response: {}", e)))?;

        if let Some(error) = envelope.error {
            tracing::debug!(method = method, code = error.code, "RPC error response");
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = envelope.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| Error::Transport(format!("Unexpected RPC result shape: {}", e)))
    }
}
