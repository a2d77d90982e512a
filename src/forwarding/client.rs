use std::time::Duration;

use reqwest::{Client, Method, StatusCode};

use crate::error::{Result, RouterError};

/// Deadline for one forwarded request. No retries are attempted; a timeout
/// surfaces as `ForwardingFailed` and the client must retry the whole
/// operation.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);
/// Keep-alive idle window and per-host idle connection bound for the pool.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_MAX_IDLE_PER_HOST: usize = 30;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the one pooled, keep-alive-enabled outbound client for the process.
/// Shared by discovery and forwarding so both reuse the same connections.
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent("shard-router/0.1")
        .build()
}

/// A shard's reply, carried back to the original caller unmodified.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for relaying operations to shards.
pub struct ShardClient {
    http_client: Client,
}

impl ShardClient {
    pub fn new(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Forwards one request to `http://{shard_addr}{path}` with the given
    /// query parameters and returns the shard's response as-is. The router
    /// never reinterprets or re-wraps the shard's payload.
    pub async fn forward(
        &self,
        method: Method,
        shard_addr: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ForwardedResponse> {
        let url = format!("http://{}{}", shard_addr, path);

        let response = self
            .http_client
            .request(method, &url)
            .query(query)
            .timeout(FORWARD_TIMEOUT)
            .send()
            .await
            .map_err(|e| RouterError::ForwardingFailed {
                addr: shard_addr.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| RouterError::ForwardingFailed {
                addr: shard_addr.to_string(),
                reason: e.to_string(),
            })?
            .to_vec();

        tracing::debug!("Forwarded {} to {}, shard answered {}", path, shard_addr, status);

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}
