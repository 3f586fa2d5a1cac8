//! # Integration Test Flows
//!
//! Two sessions connected by an in-memory channel pair: a client calling and
//! a server routing. Exercises the full path
//!
//! 1. **Client**: build request → register → encode → send
//! 2. **Server**: decode + normalize → route → stamp ID → encode → send
//! 3. **Client**: decode → resolve pending entry → deliver envelope

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rapport::adapters::channel::{pair, ChannelSender};
    use rapport::adapters::JsonEncoding;
    use rapport::{
        errors, status, wire, Envelope, RapportConfig, Received, Request, RequestTimeout,
        Response, Router, Session, Validatable,
    };
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    type JsonSession = Session<JsonEncoding, ChannelSender>;

    const CALL_TIMEOUT: Duration = Duration::from_secs(5);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    #[derive(Debug, Deserialize)]
    struct NewUser {
        name: String,
        age: u32,
    }

    impl Validatable for NewUser {
        fn validate(&self) -> Result<(), Envelope> {
            if self.name.trim().is_empty() {
                return Err(errors::bad_request("name is required"));
            }
            Ok(())
        }
    }

    /// Routes on the first URL segment, then on the remaining route
    struct UserRouter;

    #[async_trait]
    impl Router for UserRouter {
        async fn handle(&self, request: &Request) -> Response {
            let envelope = match request.prefix() {
                "/users" => users(request),
                "/square" => square(request),
                _ => errors::not_found(),
            };
            envelope.into_response(request)
        }
    }

    fn users(request: &Request) -> Envelope {
        match request.route_without_prefix().as_str() {
            "GET /4" => Envelope::new().with_payload(json!({"id": 4, "name": "ada"})),
            "POST /" => match request.decode_body::<NewUser>() {
                Ok(user) => Envelope::new()
                    .with_status(201)
                    .with_payload(json!({"name": user.name, "age": user.age})),
                Err(envelope) => envelope,
            },
            _ => errors::not_found(),
        }
    }

    fn square(request: &Request) -> Envelope {
        match request.float() {
            Ok(x) => Envelope::new().with_payload(json!(x * x)),
            Err(envelope) => envelope,
        }
    }

    /// Client and server sessions, each with its listener running.
    fn connect(config: &RapportConfig) -> (Arc<JsonSession>, Arc<JsonSession>) {
        crate::init_test_tracing();

        let (local, remote) = pair(64);
        let client = Arc::new(Session::new(config, JsonEncoding, local.sender));
        let server = Arc::new(Session::new(config, JsonEncoding, remote.sender));

        let mut client_inbound = local.receiver;
        let listener = client.clone();
        tokio::spawn(async move { listener.listen(&mut client_inbound, &UserRouter).await });

        let mut server_inbound = remote.receiver;
        let listener = server.clone();
        tokio::spawn(async move { listener.listen(&mut server_inbound, &UserRouter).await });

        (client, server)
    }

    // =============================================================================
    // ROUND TRIPS
    // =============================================================================

    #[tokio::test]
    async fn test_get_round_trip() -> anyhow::Result<()> {
        let (client, _server) = connect(&RapportConfig::default());

        let request = client.get("/users/4");
        let envelope = client.call(&request, CALL_TIMEOUT).await?;

        assert_eq!(envelope.status, status::OK);
        assert_eq!(envelope.payload, json!({"id": 4, "name": "ada"}));
        assert_eq!(client.cache().pending_count(), 0);
        assert_eq!(client.cache().stats().snapshot().resolved, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_decodes_and_validates_body() {
        let (client, _server) = connect(&RapportConfig::default());

        let created = client
            .call(&client.post("/users", json!({"name": "bo", "age": 31})), CALL_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(created.status, 201);
        assert_eq!(created.payload["age"], 31);

        let invalid = client
            .call(&client.post("/users", json!({"name": " ", "age": 1})), CALL_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(invalid.status, status::BAD_REQUEST);
        assert_eq!(invalid.payload["message"], "name is required");

        let not_object = client
            .call(&client.post("/users", "bo"), CALL_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(not_object.status, status::BAD_REQUEST);
        assert_eq!(not_object.payload["message"], "Please supply an object body");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (client, _server) = connect(&RapportConfig::default());

        let envelope = client
            .call(&client.delete("/nowhere/1"), CALL_TIMEOUT)
            .await
            .unwrap();

        assert!(!envelope.is_ok());
        assert_eq!(envelope.status, status::NOT_FOUND);
        assert_eq!(envelope.payload["name"], "NotFoundError");
    }

    #[tokio::test]
    async fn test_float_coercion_across_the_wire() {
        let (client, _server) = connect(&RapportConfig::default());

        let squared = client
            .call(&client.post("/square", 3), CALL_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(squared.payload.as_f64(), Some(9.0));

        let rejected = client
            .call(&client.post("/square", "three"), CALL_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(rejected.status, status::BAD_REQUEST);
        assert_eq!(rejected.payload["message"], "Please supply a float");
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_correlated() {
        let (client, _server) = connect(&RapportConfig::default());

        let calls: Vec<_> = (0..50i64)
            .map(|n| {
                let client = client.clone();
                tokio::spawn(async move {
                    let envelope = client
                        .call(&client.post("/square", n), CALL_TIMEOUT)
                        .await
                        .unwrap();
                    (n, envelope)
                })
            })
            .collect();

        for call in calls {
            let (n, envelope) = call.await.unwrap();
            assert_eq!(envelope.payload.as_f64(), Some((n * n) as f64));
        }

        assert_eq!(client.cache().pending_count(), 0);
        assert_eq!(client.cache().stats().snapshot().resolved, 50);
    }

    // =============================================================================
    // SERVER SIDE
    // =============================================================================

    #[tokio::test]
    async fn test_server_normalizes_raw_request() -> anyhow::Result<()> {
        let (local, mut remote) = pair(4);
        let server = Session::new(&RapportConfig::default(), JsonEncoding, local.sender);

        let raw = br#"{"request_id":"77","body":{"method":" post ","url":"users/","body":{"name":"bo","age":3}}}"#;
        let received = server.receive(raw, &UserRouter).await?;
        assert_eq!(
            received,
            Received::Request {
                id: "77".into(),
                is_error: false
            }
        );

        let bytes = remote
            .receiver
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("server sent no reply"))?;
        let reply = wire::to_response(&JsonEncoding, &bytes)?;
        assert_eq!(reply.id, "77");
        assert_eq!(reply.into_envelope().status, 201);
        Ok(())
    }

    #[tokio::test]
    async fn test_fire_and_forget_reply_is_harmless() {
        let (client, _server) = connect(&RapportConfig::default());

        let request = client.post("/users", json!({"name": "cy", "age": 9}));
        let handle = client
            .send(&request, RequestTimeout::NoResponse)
            .await
            .unwrap();
        assert!(handle.is_none());
        assert_eq!(client.cache().pending_count(), 0);

        // The server still answers; the client drops it as a late arrival.
        tokio::time::timeout(Duration::from_secs(2), async {
            while client.cache().stats().snapshot().late_arrivals == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        let stats = client.cache().stats().snapshot();
        assert_eq!(stats.fire_and_forget, 1);
        assert_eq!(stats.resolved, 0);
    }

    #[tokio::test]
    async fn test_ids_come_from_configured_generator() {
        let mut config = RapportConfig::default();
        config.ids.ceiling = 2;
        let (client, _server) = connect(&config);

        let ids: Vec<String> = (0..5).map(|_| client.get("/users/4").id).collect();
        assert_eq!(ids, ["1", "2", "1", "2", "1"]);
    }
}
