//! Gateway Protocol
//!
//! Defines the router's public endpoints and the JSON envelope used for
//! router-generated responses. Forwarded shard responses bypass the envelope
//! entirely; they are relayed byte-for-byte.

use serde::Serialize;

// --- API Endpoints ---

/// Router health and discovered shard count.
pub const ENDPOINT_STATUS: &str = "/status";
/// Routed read. The same path is used on the shard side.
pub const ENDPOINT_GET: &str = "/get";
/// Routed write. The same path is used on the shard side.
pub const ENDPOINT_PUT: &str = "/put";
/// Routed delete. The same path is used on the shard side.
pub const ENDPOINT_DELETE: &str = "/delete";

// --- Envelope ---

/// Envelope for responses the router generates itself (status, parameter and
/// routing errors). Optional fields are omitted when empty.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: serde_json::Value, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(message),
        }
    }
}
