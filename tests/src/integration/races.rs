//! # Resolution Races
//!
//! Every registered request gets exactly one outcome, whichever of the real
//! response and the timeout reaches the registry first. These tests run on a
//! paused clock so the orderings are deterministic.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rapport::adapters::channel::{pair, ChannelSender};
    use rapport::adapters::JsonEncoding;
    use rapport::{
        status, CacheError, CorrelationCache, DeliveryError, Envelope, RapportConfig, Request,
        Response, Router, Session, SessionError,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    type JsonSession = Session<JsonEncoding, ChannelSender>;

    /// Answers every request after a fixed delay
    struct SlowRouter {
        delay: Duration,
    }

    #[async_trait]
    impl Router for SlowRouter {
        async fn handle(&self, request: &Request) -> Response {
            sleep(self.delay).await;
            Envelope::new()
                .with_payload(json!({"url": request.url()}))
                .into_response(request)
        }
    }

    fn connect(config: &RapportConfig, delay: Duration) -> Arc<JsonSession> {
        crate::init_test_tracing();

        let (local, remote) = pair(64);
        let client = Arc::new(Session::new(config, JsonEncoding, local.sender));
        let server = Session::new(config, JsonEncoding, remote.sender);

        let mut client_inbound = local.receiver;
        let listener = client.clone();
        tokio::spawn(async move {
            let router = SlowRouter {
                delay: Duration::ZERO,
            };
            listener.listen(&mut client_inbound, &router).await
        });

        let mut server_inbound = remote.receiver;
        tokio::spawn(async move {
            let router = SlowRouter { delay };
            server.listen(&mut server_inbound, &router).await
        });

        client
    }

    fn ok(id: &str) -> Response {
        Response::ok(id, Envelope::new())
    }

    // =============================================================================
    // RESPONSE VS TIMEOUT
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_slow_server_times_out_then_late_reply_is_dropped() {
        let client = connect(&RapportConfig::default(), Duration::from_millis(500));

        let start = Instant::now();
        let envelope = client
            .call(&client.get("/slow"), Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(envelope.status, status::GATEWAY_TIMEOUT);
        assert!(start.elapsed() < Duration::from_millis(500));

        sleep(Duration::from_secs(1)).await;
        let stats = client.cache().stats().snapshot();
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.late_arrivals, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_server_beats_timeout_without_stray_delivery() {
        let client = connect(&RapportConfig::default(), Duration::from_millis(50));

        let envelope = client
            .call(&client.get("/fast"), Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(envelope.status, status::OK);
        assert_eq!(envelope.payload["url"], "/fast");

        sleep(Duration::from_secs(1)).await;
        let stats = client.cache().stats().snapshot();
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.timeouts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_at_deadline_has_single_winner() {
        let cache = CorrelationCache::new();
        let handle = cache
            .register("1", Duration::from_millis(100))
            .unwrap()
            .unwrap();

        let resolver = {
            let cache = cache.clone();
            tokio::spawn(async move {
                sleep(Duration::from_millis(100)).await;
                cache.resolve(ok("1"))
            })
        };

        let envelope = handle.await.unwrap();
        let response_won = resolver.await.unwrap();

        if response_won {
            assert_eq!(envelope.status, status::OK);
        } else {
            assert_eq!(envelope.status, status::GATEWAY_TIMEOUT);
        }

        let stats = cache.stats().snapshot();
        assert_eq!(stats.resolved + stats.timeouts, 1);
        assert_eq!(cache.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interleaved_deadlines() {
        let cache = CorrelationCache::new();

        let handles: Vec<_> = (1..=20u64)
            .map(|n| {
                cache
                    .register(&n.to_string(), Duration::from_millis(n * 10))
                    .unwrap()
                    .unwrap()
            })
            .collect();

        for n in (2..=20u64).step_by(2) {
            assert!(cache.resolve(ok(&n.to_string())));
        }

        for (n, handle) in (1..=20u64).zip(handles) {
            let envelope = handle.await.unwrap();
            let expected = if n % 2 == 0 {
                status::OK
            } else {
                status::GATEWAY_TIMEOUT
            };
            assert_eq!(envelope.status, expected, "request {n}");
        }

        let stats = cache.stats().snapshot();
        assert_eq!(stats.resolved, 10);
        assert_eq!(stats.timeouts, 10);
    }

    // =============================================================================
    // CANCELLATION AND SHUTDOWN
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_server_is_working() {
        let client = connect(&RapportConfig::default(), Duration::from_millis(200));

        let request = client.get("/work");
        let handle = client
            .send(&request, Duration::from_secs(1))
            .await
            .unwrap()
            .unwrap();

        sleep(Duration::from_millis(50)).await;
        assert!(client.cache().cancel(&request.id));
        assert_eq!(
            handle.await.unwrap_err(),
            DeliveryError::Cancelled {
                id: request.id.clone()
            }
        );

        sleep(Duration::from_secs(2)).await;
        let stats = client.cache().stats().snapshot();
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.late_arrivals, 1);
        assert_eq!(stats.timeouts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_releases_every_waiter() {
        let cache = CorrelationCache::new();
        let handles: Vec<_> = (0..8)
            .map(|n| {
                cache
                    .register(&format!("req-{n}"), Duration::from_secs(60))
                    .unwrap()
                    .unwrap()
            })
            .collect();

        assert_eq!(cache.shutdown(), 8);
        for handle in handles {
            assert!(matches!(handle.await, Err(DeliveryError::Closed { .. })));
        }

        // Still usable afterwards
        let handle = cache.register("after", Duration::from_secs(1)).unwrap().unwrap();
        cache.resolve(ok("after"));
        assert_eq!(handle.await.unwrap().status, status::OK);
    }

    // =============================================================================
    // BOUNDED ID SPACE
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_wrapped_id_collides_with_pending_request() {
        let mut config = RapportConfig::default();
        config.ids.ceiling = 1;
        let client = connect(&config, Duration::from_millis(500));

        let first = client.get("/a");
        let handle = client
            .send(&first, Duration::from_secs(1))
            .await
            .unwrap()
            .unwrap();

        let second = client.get("/b");
        assert_eq!(second.id, first.id);
        let err = client
            .send(&second, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Cache(CacheError::DuplicateId {
                id: first.id.clone()
            })
        );

        assert_eq!(handle.await.unwrap().payload["url"], "/a");

        // Once resolved, the ID is free again
        let third = client.get("/c");
        let envelope = client.call(&third, Duration::from_secs(1)).await.unwrap();
        assert_eq!(envelope.payload["url"], "/c");
    }
}
