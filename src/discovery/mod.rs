//! Topology Discovery Module
//!
//! Maintains the router's view of the cluster: how many shards exist and which
//! leader address currently serves each shard.
//!
//! ## Core Mechanisms
//! - **Discovery race**: `/config` is queried on every bootstrap shard
//!   concurrently; the first successful answer wins and the remaining in-flight
//!   attempts are cancelled so their connections are released.
//! - **Caching**: The winning topology is cached for a TTL window. Within the
//!   window every routing decision is served without I/O.
//! - **Single-flight**: Concurrent callers that observe an expired cache share
//!   one in-flight race instead of each starting their own.
//! - **Address translation**: Leader addresses advertised by the consensus
//!   layer are translated into client-facing addresses before use.

pub mod address;
pub mod protocol;
pub mod service;

#[cfg(test)]
mod tests;

pub use protocol::ClusterConfig;
pub use service::DiscoveryService;
