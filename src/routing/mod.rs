//! Key Routing Module
//!
//! Implements deterministic key-to-shard assignment.
//!
//! ## Core Concepts
//! - **Hashing**: Keys are hashed with MurmurHash3 (64-bit variant) over their UTF-8 bytes.
//! - **Bucket partition**: The hash space is reduced modulo 16384 and split into
//!   `shard_count` contiguous bucket ranges; the bucket a key falls into determines
//!   the owning shard.
//! - **Stability**: For a fixed shard count, the same key always maps to the same
//!   shard index. No guarantee is made across shard-count changes.

pub mod partitioner;


pub use partitioner::{hash_key, shard_index_for_key, shard_index_from_hash, HASH_SLOTS};
