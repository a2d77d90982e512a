use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use serde_json::json;

use super::protocol::{ApiResponse, ENDPOINT_DELETE, ENDPOINT_GET, ENDPOINT_PUT};
use super::RouterContext;
use crate::error::{Result, RouterError};
use crate::forwarding::ForwardedResponse;
use crate::routing;

pub async fn handle_status(Extension(ctx): Extension<Arc<RouterContext>>) -> Response {
    match ctx.discovery.shard_count().await {
        Ok(shard_count) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                json!({ "shardCount": shard_count }),
                "Router status retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error getting shard count: {}", e);
            error_response(&e)
        }
    }
}

pub async fn handle_get(
    Extension(ctx): Extension<Arc<RouterContext>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(key) = request_param(&params, &headers, &body, "key") else {
        return error_response(&RouterError::MissingParameter("key"));
    };

    let forwarded = route_and_forward(&ctx, Method::GET, ENDPOINT_GET, &key, &[]).await;
    match forwarded {
        Ok(upstream) => relay(upstream),
        Err(e) => {
            tracing::error!("GET failed for key {:?}: {}", key, e);
            error_response(&e)
        }
    }
}

pub async fn handle_put(
    Extension(ctx): Extension<Arc<RouterContext>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(key) = request_param(&params, &headers, &body, "key") else {
        return error_response(&RouterError::MissingParameter("key"));
    };
    let Some(val) = request_param(&params, &headers, &body, "val") else {
        return error_response(&RouterError::MissingParameter("val"));
    };

    let forwarded =
        route_and_forward(&ctx, Method::POST, ENDPOINT_PUT, &key, &[("val", &val)]).await;
    match forwarded {
        Ok(upstream) => relay(upstream),
        Err(e) => {
            tracing::error!("PUT failed for key {:?}: {}", key, e);
            error_response(&e)
        }
    }
}

pub async fn handle_delete(
    Extension(ctx): Extension<Arc<RouterContext>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(key) = request_param(&params, &headers, &body, "key") else {
        return error_response(&RouterError::MissingParameter("key"));
    };

    let forwarded = route_and_forward(&ctx, Method::DELETE, ENDPOINT_DELETE, &key, &[]).await;
    match forwarded {
        Ok(upstream) => relay(upstream),
        Err(e) => {
            tracing::error!("DELETE failed for key {:?}: {}", key, e);
            error_response(&e)
        }
    }
}

/// Steps 3-6 of every key-bearing operation: shard count, shard index, leader
/// address, forward. The key always travels as the `key` query parameter;
/// `extra` carries operation-specific parameters (`val` for puts).
async fn route_and_forward(
    ctx: &RouterContext,
    method: Method,
    path: &str,
    key: &str,
    extra: &[(&str, &str)],
) -> Result<ForwardedResponse> {
    let shard_count = ctx.discovery.shard_count().await?;
    let index = routing::shard_index_for_key(key, shard_count)?;

    // Shard ids in the cluster config are 1-based.
    let address = ctx.discovery.shard_address(index + 1).await?;

    tracing::debug!(
        "Routing {} {} for key {:?} to shard {} at {}",
        method,
        path,
        key,
        index + 1,
        address
    );

    let mut query: Vec<(&str, &str)> = vec![("key", key)];
    query.extend_from_slice(extra);

    ctx.shards.forward(method, &address, path, &query).await
}

/// Looks a parameter up in the query string, falling back to a form-encoded
/// body. Both sources arrive percent-decoded.
fn request_param(
    params: &HashMap<String, String>,
    headers: &HeaderMap,
    body: &str,
    name: &str,
) -> Option<String> {
    if let Some(value) = params.get(name) {
        return Some(value.clone());
    }

    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    if !content_type.starts_with("application/x-www-form-urlencoded") {
        return None;
    }

    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Relays a shard response to the caller with status and body unmodified.
fn relay(upstream: ForwardedResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    (
        upstream.status,
        [(CONTENT_TYPE, content_type)],
        upstream.body,
    )
        .into_response()
}

fn error_response(err: &RouterError) -> Response {
    (err.status_code(), Json(ApiResponse::error(err.to_string()))).into_response()
}
