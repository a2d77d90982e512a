//! Error types for the shard router.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Main error type for the routing tier.
///
/// Every failure a request can hit between arrival and forwarding is a named
/// variant so error paths stay visible at the call sites. All variants are
/// caught at the gateway boundary and converted into a JSON error envelope;
/// none of them terminate the process.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A required request parameter is absent.
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// A non-positive shard count reached the partitioner. Defensive; a shard
    /// would have to advertise a zero shard count for this to surface.
    #[error("shard count must be positive")]
    InvalidShardCount,

    /// No bootstrap endpoint returned a usable cluster configuration.
    #[error("could not retrieve cluster configuration from any shard")]
    DiscoveryUnavailable,

    /// The resolved shard id is missing from the current configuration
    /// (stale topology).
    #[error("shard {0} not found in cluster configuration")]
    ShardNotFound(u32),

    /// A shard's config response carried a malformed leader address.
    #[error("invalid leader address: {0}")]
    InvalidAddress(String),

    /// Network failure or timeout while contacting the resolved shard.
    #[error("error contacting shard at {addr}: {reason}")]
    ForwardingFailed { addr: String, reason: String },
}

impl RouterError {
    /// HTTP status the gateway maps this error to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouterError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
