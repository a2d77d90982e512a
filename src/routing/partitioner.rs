use crate::error::{Result, RouterError};
use murmurhash3::murmurhash3_x64_128;

/// Size of the reduced hash space. Shard buckets are contiguous sub-ranges of
/// `[0, HASH_SLOTS)`.
pub const HASH_SLOTS: u64 = 16384;

/// Hashes a string key with MurmurHash3 (x64_128, seed 0) and keeps the first
/// 64-bit half. Matches the `mmh3.hash64(key)[0]` convention used by the
/// shards, so router and shards agree on key placement.
pub fn hash_key(key: &str) -> u64 {
    murmurhash3_x64_128(key.as_bytes(), 0).0
}

/// Maps a hash value to a shard index in `[0, shard_count)`.
///
/// The reduced hash (`hash % 16384`) is scanned against `shard_count`
/// contiguous buckets of `16384 / shard_count` slots each. Integer division
/// can leave a remainder of slots past the last bucket boundary; those fall
/// to the final shard.
pub fn shard_index_from_hash(hash: u64, shard_count: u32) -> Result<u32> {
    if shard_count == 0 {
        return Err(RouterError::InvalidShardCount);
    }

    let reduced = hash % HASH_SLOTS;
    let bucket_size = HASH_SLOTS / shard_count as u64;

    for i in 0..shard_count {
        if reduced < (i as u64 + 1) * bucket_size {
            return Ok(i);
        }
    }

    Ok(shard_count - 1)
}

/// Composite: shard index owning `key` under the given shard count.
pub fn shard_index_for_key(key: &str, shard_count: u32) -> Result<u32> {
    shard_index_from_hash(hash_key(key), shard_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_index() {
        let i1 = shard_index_for_key("book_100", 3).unwrap();
        let i2 = shard_index_for_key("book_100", 3).unwrap();
        assert_eq!(i1, i2);

        assert!(i1 < 3);
    }

    #[test]
    fn test_zero_shard_count_rejected() {
        assert!(matches!(
            shard_index_for_key("book_100", 0),
            Err(RouterError::InvalidShardCount)
        ));
    }
}
