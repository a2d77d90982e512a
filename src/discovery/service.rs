use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::address;
use super::protocol::{ClusterConfig, ConfigResponse, ENDPOINT_CONFIG};
use crate::error::{Result, RouterError};

/// How long a discovered topology is served without re-querying the shards.
const CACHE_TTL: Duration = Duration::from_secs(30);
/// Per-endpoint deadline for one `/config` attempt.
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// A cached topology and the moment it was fetched.
struct CacheEntry {
    config: Arc<ClusterConfig>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Discovers and caches the cluster topology.
///
/// Holds a fixed bootstrap list of shard endpoints supplied at startup. On a
/// cache miss all of them are raced concurrently; the first shard answering
/// `/config` with `success == true` supplies the new topology and the losing
/// attempts are aborted so their connections are released.
pub struct DiscoveryService {
    endpoints: Vec<String>,
    client: reqwest::Client,
    ttl: Duration,
    /// Single cache slot. The race runs while the lock is held, so concurrent
    /// callers hitting an expired cache wait for the in-flight attempt and
    /// then read the fresh entry instead of starting their own race.
    cache: Mutex<Option<CacheEntry>>,
}

impl DiscoveryService {
    /// Creates a service querying the given bootstrap endpoints.
    ///
    /// Entries are `host:port`; a bare port is normalized to `127.0.0.1:port`.
    pub fn new(endpoints: Vec<String>, client: reqwest::Client) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|e| {
                let e = e.trim().to_string();
                if e.contains(':') {
                    e
                } else {
                    format!("127.0.0.1:{}", e)
                }
            })
            .collect();

        Self {
            endpoints,
            client,
            ttl: CACHE_TTL,
            cache: Mutex::new(None),
        }
    }

    /// Overrides the cache TTL. Used by tests to force expiry quickly.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the current cluster topology, from cache when fresh, otherwise
    /// via a discovery race. An expired entry is never served as a fallback:
    /// if no endpoint answers, the call fails with `DiscoveryUnavailable`.
    pub async fn config(&self) -> Result<Arc<ClusterConfig>> {
        let mut cache = self.cache.lock().await;

        if let Some(entry) = cache.as_ref() {
            if entry.is_valid(self.ttl) {
                return Ok(entry.config.clone());
            }
        }

        match self.discover().await {
            Some(config) => {
                let config = Arc::new(config);
                *cache = Some(CacheEntry {
                    config: config.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(config)
            }
            None => {
                tracing::error!("Failed to get cluster config from any shard");
                Err(RouterError::DiscoveryUnavailable)
            }
        }
    }

    /// Number of shards in the current topology.
    pub async fn shard_count(&self) -> Result<u32> {
        Ok(self.config().await?.shard_count)
    }

    /// Client-facing address of the given 1-based shard id.
    pub async fn shard_address(&self, shard_id: u32) -> Result<String> {
        let config = self.config().await?;

        let leader = config
            .shards
            .get(&shard_id)
            .filter(|addr| !addr.is_empty())
            .ok_or(RouterError::ShardNotFound(shard_id))?;

        address::translate(leader)
    }

    /// Races one `/config` attempt per bootstrap endpoint and returns the
    /// first successful topology, aborting the rest. Attempts that time out,
    /// error, or answer `success == false` are logged and ignored; they are
    /// not retried within this call.
    async fn discover(&self) -> Option<ClusterConfig> {
        let mut attempts = JoinSet::new();

        for endpoint in &self.endpoints {
            let client = self.client.clone();
            let url = format!("http://{}{}", endpoint, ENDPOINT_CONFIG);
            attempts.spawn(async move { (fetch_config(client, &url).await, url) });
        }

        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok((Some(config), url)) => {
                    tracing::info!("Using shard at {} for cluster config", url);
                    // Losers are aborted here; dropping their in-flight
                    // requests closes the connections.
                    attempts.abort_all();
                    return Some(config);
                }
                Ok((None, _)) => {}
                Err(e) => {
                    if !e.is_cancelled() {
                        tracing::warn!("Discovery attempt panicked: {}", e);
                    }
                }
            }
        }

        None
    }
}

/// One discovery attempt. Any failure maps to `None` so it simply does not
/// contribute a result to the race.
async fn fetch_config(client: reqwest::Client, url: &str) -> Option<ClusterConfig> {
    tracing::debug!("Attempting to fetch config from {}", url);

    let response = match client
        .get(url)
        .timeout(DISCOVERY_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!("Failed to reach {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Config request to {} returned {}", url, response.status());
        return None;
    }

    match response.json::<ConfigResponse>().await {
        Ok(ConfigResponse {
            success: true,
            data: Some(config),
        }) => Some(config),
        Ok(_) => {
            tracing::debug!("Shard at {} reported an unsuccessful config", url);
            None
        }
        Err(e) => {
            tracing::debug!("Invalid config payload from {}: {}", url, e);
            None
        }
    }
}
