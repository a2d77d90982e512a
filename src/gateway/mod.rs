//! Gateway Module
//!
//! The public HTTP surface of the router. Each handler composes the other
//! subsystems per request: resolve the shard count, compute the key's shard
//! index, resolve the shard's leader address, forward, relay the answer.
//!
//! ## Endpoints
//! - `GET /status` — router health, reports the discovered shard count.
//! - `GET /get?key=` — routed read, shard response relayed verbatim.
//! - `POST /put?key=&val=` — routed write, shard response relayed verbatim.
//! - `DELETE /delete?key=` — routed delete, shard response relayed verbatim.

pub mod handlers;
pub mod protocol;


use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Extension, Router};

use crate::discovery::DiscoveryService;
use crate::forwarding::ShardClient;
use protocol::{ENDPOINT_DELETE, ENDPOINT_GET, ENDPOINT_PUT, ENDPOINT_STATUS};

/// Everything a request handler needs, constructed once at startup and passed
/// by handle into every handler. No hidden process globals.
pub struct RouterContext {
    pub discovery: DiscoveryService,
    pub shards: ShardClient,
}

/// Assembles the axum application around a router context.
pub fn app(ctx: Arc<RouterContext>) -> Router {
    Router::new()
        .route(ENDPOINT_STATUS, get(handlers::handle_status))
        .route(ENDPOINT_GET, get(handlers::handle_get))
        .route(ENDPOINT_PUT, post(handlers::handle_put))
        .route(ENDPOINT_DELETE, delete(handlers::handle_delete))
        .layer(Extension(ctx))
}
