//! Shard Router Library
//!
//! This library crate defines the routing tier that sits in front of a sharded,
//! Raft-replicated key-value store. It serves as the foundation for the binary
//! executable (`main.rs`).
//!
//! ## Architecture Modules
//! The router is composed of four loosely coupled subsystems plus a shared
//! error taxonomy:
//!
//! - **`routing`**: Deterministic key placement. Hashes keys with MurmurHash3
//!   and maps the reduced hash onto contiguous shard buckets.
//! - **`discovery`**: Cluster topology discovery. Races `/config` queries
//!   against the bootstrap shards, caches the winning topology, and translates
//!   consensus-layer leader addresses into client-facing ones.
//! - **`forwarding`**: The outbound HTTP path. Holds the pooled client and
//!   relays operations to a resolved shard, passing the response through
//!   unmodified.
//! - **`gateway`**: The public HTTP surface (`/status`, `/get`, `/put`,
//!   `/delete`). Composes the other subsystems per request.
//! - **`error`**: The `RouterError` taxonomy shared by every subsystem.

pub mod discovery;
pub mod error;
pub mod forwarding;
pub mod gateway;
pub mod routing;

pub use error::{Result, RouterError};
