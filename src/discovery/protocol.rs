//! Discovery Network Protocol
//!
//! Defines the endpoint and Data Transfer Objects (DTOs) of the `/config`
//! contract every shard exposes. The router never writes this data; it only
//! consumes what the shards advertise.

use serde::Deserialize;
use std::collections::HashMap;

/// Endpoint each shard serves its cluster topology on.
pub const ENDPOINT_CONFIG: &str = "/config";

/// The cluster topology as advertised by a shard.
///
/// Immutable once produced: a new discovery race yields a new instance, the
/// cache entry is replaced, never mutated in place.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Number of shards in the cluster.
    pub shard_count: u32,
    /// Leader address per 1-based shard id, as reported by the consensus
    /// layer (`host:port`, possibly a Raft-side port).
    pub shards: HashMap<u32, String>,
}

/// Envelope a shard wraps its `/config` payload in.
///
/// A response with `success == false` (or no payload) does not contribute to
/// the discovery race.
#[derive(Debug, Deserialize)]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ClusterConfig>,
}
