//! Request Forwarding Module
//!
//! The outbound HTTP path of the router. Owns the process-wide pooled client
//! and relays key operations to a resolved shard address, passing the shard's
//! status and body back verbatim.

pub mod client;


pub use client::{build_http_client, ForwardedResponse, ShardClient};
