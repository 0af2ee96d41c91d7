//! Shared HTTP JSON-RPC client.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::TransportError;

/// Response header carrying the relay bundle id of a `sendTransaction` call.
pub const BUNDLE_ID_HEADER: &str = "x-bundle-id";

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Path appended to the endpoint (e.g., "/api/v1/bundles").
    pub path: Option<String>,
    /// Extra query parameters.
    pub query: Vec<(String, String)>,
    /// Full `Authorization` header value.
    pub authorization: Option<String>,
}

impl CallOptions {
    /// Options targeting `path`.
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach an `Authorization` header when one is given.
    pub fn with_authorization(mut self, authorization: Option<&str>) -> Self {
        self.authorization = authorization.map(str::to_owned);
        self
    }
}

/// Decoded result plus selected response headers.
#[derive(Debug, Clone)]
pub struct RpcResponse<R> {
    pub result: R,
    /// Value of the `x-bundle-id` header, when present.
    pub bundle_id: Option<String>,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcEnvelope<R> {
    result: Option<R>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one endpoint.
#[derive(Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: Url,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    /// Create a client with a per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            TransportError::Config(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Call `method` at the endpoint root.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R, TransportError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let response = self.call_with(method, params, &CallOptions::default()).await?;
        Ok(response.result)
    }

    /// Call `method` with explicit path, query and auth options.
    pub async fn call_with<P, R>(
        &self,
        method: &str,
        params: P,
        options: &CallOptions,
    ) -> Result<RpcResponse<R>, TransportError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let url = self.url_for(options)?;
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut builder = self.http.post(url).json(&request);
        if let Some(authorization) = &options.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Http(format!("rpc call {}(): {}", method, e)))?;

        let status = response.status();
        let bundle_id = response
            .headers()
            .get(BUNDLE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(format!("rpc call {}(): {}", method, e)))?;

        let envelope: JsonRpcEnvelope<R> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => {
                return Err(TransportError::Decode(format!(
                    "rpc call {}(): {}",
                    method, e
                )))
            }
        };

        if let Some(error) = envelope.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        match envelope.result {
            Some(result) => Ok(RpcResponse { result, bundle_id }),
            None if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
            None => Err(TransportError::Decode(format!(
                "rpc call {}() returned neither result nor error",
                method
            ))),
        }
    }

    fn url_for(&self, options: &CallOptions) -> Result<Url, TransportError> {
        let mut url = match &options.path {
            Some(path) => self
                .endpoint
                .join(path)
                .map_err(|e| TransportError::Config(format!("invalid path '{}': {}", path, e)))?,
            None => self.endpoint.clone(),
        };
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &options.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}
