//! Discovery Module Tests
//!
//! Validates topology discovery against live stub shards bound on ephemeral
//! ports.
//!
//! ## Test Scopes
//! - **Caching**: Fresh entries are served without I/O; expired entries force
//!   a new race; concurrent callers coalesce onto one in-flight attempt.
//! - **Racing**: The first successful `/config` answer wins without waiting
//!   for slow endpoints, and the losing attempts are observably cancelled;
//!   unsuccessful answers never win; a cluster-wide outage surfaces as
//!   `DiscoveryUnavailable`.
//! - **Resolution**: Shard id lookup and leader address translation.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::discovery::DiscoveryService;
    use crate::error::RouterError;

    /// Spawns a stub shard serving `/config` with the given payload after an
    /// optional delay. Returns its `host:port`, a counter of requests that
    /// reached the handler, and a counter of responses that were actually
    /// completed. A cancelled request bumps the first but never the second:
    /// when the router aborts a losing attempt the connection drops and the
    /// handler future is dropped mid-sleep.
    async fn spawn_config_server(
        payload: serde_json::Value,
        delay: Duration,
    ) -> (String, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let hit_counter = hits.clone();
        let completed_counter = completed.clone();

        let app = Router::new().route(
            "/config",
            get(move || {
                let payload = payload.clone();
                let hit_counter = hit_counter.clone();
                let completed_counter = completed_counter.clone();
                async move {
                    hit_counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    completed_counter.fetch_add(1, Ordering::SeqCst);
                    Json(payload)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub shard");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("127.0.0.1:{}", addr.port()), hits, completed)
    }

    fn config_payload(shard_count: u32) -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "shardCount": shard_count,
                "shards": { "1": "127.0.0.1:8011" }
            }
        })
    }

    // ============================================================
    // CACHING
    // ============================================================

    #[tokio::test]
    async fn test_fresh_cache_serves_without_io() {
        let (endpoint, hits, _) = spawn_config_server(config_payload(3), Duration::ZERO).await;
        let service = DiscoveryService::new(vec![endpoint], reqwest::Client::new());

        let first = service.config().await.unwrap();
        let second = service.config().await.unwrap();

        // Identical cached object, one network round-trip.
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_new_race() {
        let (endpoint, hits, _) = spawn_config_server(config_payload(3), Duration::ZERO).await;
        let service = DiscoveryService::new(vec![endpoint], reqwest::Client::new())
            .with_ttl(Duration::from_millis(50));

        service.config().await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        service.config().await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_flight() {
        let (endpoint, hits, _) =
            spawn_config_server(config_payload(3), Duration::from_millis(200)).await;
        let service = Arc::new(DiscoveryService::new(
            vec![endpoint],
            reqwest::Client::new(),
        ));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.config().await }));
        }
        for handle in handles {
            let config = handle.await.unwrap().unwrap();
            assert_eq!(config.shard_count, 3);
        }

        assert_eq!(
            hits.load(Ordering::SeqCst),
            1,
            "Concurrent callers should coalesce onto a single discovery"
        );
    }

    // ============================================================
    // RACING
    // ============================================================

    #[tokio::test]
    async fn test_first_success_wins_and_cancels_slow_shards() {
        let slow_delay = Duration::from_secs(1);
        let (fast, _, _) = spawn_config_server(config_payload(3), Duration::from_millis(100)).await;
        let (slow1, slow1_hits, slow1_completed) =
            spawn_config_server(config_payload(99), slow_delay).await;
        let (slow2, slow2_hits, slow2_completed) =
            spawn_config_server(config_payload(99), slow_delay).await;

        let service = DiscoveryService::new(vec![slow1, fast, slow2], reqwest::Client::new());

        let started = Instant::now();
        let config = service.config().await.unwrap();

        assert_eq!(config.shard_count, 3);
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "Race should resolve with the fast shard, took {:?}",
            started.elapsed()
        );

        // Both slow shards were contacted as part of the fan-out.
        assert_eq!(slow1_hits.load(Ordering::SeqCst), 1);
        assert_eq!(slow2_hits.load(Ordering::SeqCst), 1);

        // Well past the slow delay, neither slow response ever completed:
        // aborting the losing attempts dropped their connections and the
        // stub handlers with them.
        tokio::time::sleep(slow_delay + Duration::from_millis(500)).await;
        assert_eq!(
            slow1_completed.load(Ordering::SeqCst),
            0,
            "Losing attempt should have been cancelled mid-flight"
        );
        assert_eq!(
            slow2_completed.load(Ordering::SeqCst),
            0,
            "Losing attempt should have been cancelled mid-flight"
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_answer_never_wins() {
        let failing = json!({ "success": false, "error": "no leader elected" });
        let (bad, _, _) = spawn_config_server(failing, Duration::ZERO).await;
        let (good, _, _) = spawn_config_server(config_payload(5), Duration::from_millis(100)).await;

        let service = DiscoveryService::new(vec![bad, good], reqwest::Client::new());

        // The failing shard answers first but is ignored.
        let config = service.config().await.unwrap();
        assert_eq!(config.shard_count, 5);
    }

    #[tokio::test]
    async fn test_all_endpoints_down_is_discovery_unavailable() {
        let failing = json!({ "success": false });
        let (bad, _, _) = spawn_config_server(failing, Duration::ZERO).await;

        // Port 1 refuses connections; the other endpoint answers but fails.
        let service =
            DiscoveryService::new(vec!["127.0.0.1:1".to_string(), bad], reqwest::Client::new());

        assert!(matches!(
            service.config().await,
            Err(RouterError::DiscoveryUnavailable)
        ));
    }

    // ============================================================
    // RESOLUTION
    // ============================================================

    #[tokio::test]
    async fn test_shard_count_follows_config() {
        let (endpoint, _, _) = spawn_config_server(config_payload(7), Duration::ZERO).await;
        let service = DiscoveryService::new(vec![endpoint], reqwest::Client::new());

        assert_eq!(service.shard_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_shard_address_translates_raft_ports() {
        let payload = json!({
            "success": true,
            "data": {
                "shardCount": 3,
                "shards": {
                    "1": "10.0.0.1:18011",
                    "2": "10.0.0.2:8021",
                    "3": ""
                }
            }
        });
        let (endpoint, _, _) = spawn_config_server(payload, Duration::ZERO).await;
        let service = DiscoveryService::new(vec![endpoint], reqwest::Client::new());

        assert_eq!(service.shard_address(1).await.unwrap(), "10.0.0.1:8011");
        assert_eq!(service.shard_address(2).await.unwrap(), "10.0.0.2:8021");

        // Empty and absent entries both count as not found.
        assert!(matches!(
            service.shard_address(3).await,
            Err(RouterError::ShardNotFound(3))
        ));
        assert!(matches!(
            service.shard_address(9).await,
            Err(RouterError::ShardNotFound(9))
        ));
    }
}
