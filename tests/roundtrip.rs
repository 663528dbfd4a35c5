//! End-to-end tests driving the public API: publish, wrap the published
//! message in a synthetic delivery envelope, and feed it back through the
//! delivery boundary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use sns_bridge::{
    BridgeError, DeliveryEnvelope, Event, EventRouter, InMemoryTransport, Transport,
    TransportError,
};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[tokio::test]
async fn publish_then_deliver_invokes_handler_once_with_original_body() {
    let transport = InMemoryTransport::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));

    let handler_calls = Arc::clone(&calls);
    let handler_seen = Arc::clone(&seen);
    let router = EventRouter::new(transport.clone(), "123456789012", "us-east-1", "prod")
        .register("ORDER_CREATED", move |event| {
            let calls = Arc::clone(&handler_calls);
            let seen = Arc::clone(&handler_seen);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *seen.lock().unwrap() = Some(event.body.clone());
                Ok(Value::Null)
            }
        });

    let body = object(json!({
        "order_id": "o-1",
        "items": [{ "sku": "A", "qty": 2 }],
        "total": 42.5
    }));
    router
        .publish(&Event::new("ORDER_CREATED", body.clone()))
        .await
        .unwrap();

    // Feed the published message back as a platform delivery.
    let message = transport.last_message().unwrap();
    let envelope = DeliveryEnvelope::wrap(message);
    let response = router
        .handle_delivery(serde_json::to_value(&envelope).unwrap())
        .await;

    assert_eq!(response.status_code, 200);
    assert!(response.body.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(seen.lock().unwrap().as_ref(), Some(&body));
}

#[tokio::test]
async fn unregistered_event_returns_500_naming_the_event() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let router = EventRouter::new(InMemoryTransport::new(), "42", "us-east-1", "prod").register(
        "ORDER_CREATED",
        move |_| {
            let calls = Arc::clone(&handler_calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            }
        },
    );

    let envelope = DeliveryEnvelope::wrap(r#"{"NAME":"NOT_REGISTERED"}"#);
    let response = router
        .handle_delivery(serde_json::to_value(&envelope).unwrap())
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("NOT_REGISTERED"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_event_shapes_are_500_at_the_boundary() {
    let router = EventRouter::new(InMemoryTransport::new(), "42", "us-east-1", "prod")
        .register("PING", |_| async { Ok(Value::Null) });

    // Non-string NAME
    let envelope = DeliveryEnvelope::wrap(r#"{"NAME":123}"#);
    let response = router
        .handle_delivery(serde_json::to_value(&envelope).unwrap())
        .await;
    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("event.NAME"));

    // Non-object event
    let envelope = DeliveryEnvelope::wrap(r#""a string""#);
    let response = router
        .handle_delivery(serde_json::to_value(&envelope).unwrap())
        .await;
    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("expected object"));
}

#[tokio::test]
async fn malformed_envelopes_are_500_never_panics() {
    let router = EventRouter::new(InMemoryTransport::new(), "42", "us-east-1", "prod")
        .register("PING", |_| async { Ok(Value::Null) });

    for delivery in [
        json!(null),
        json!("not an envelope"),
        json!({ "Records": [] }),
        json!({ "Records": [{ "Sns": { "Message": "{broken" } }] }),
        json!({ "Records": "not an array" }),
    ] {
        let response = router.handle_delivery(delivery).await;
        assert_eq!(response.status_code, 500);
        assert!(response.body.is_some());
    }
}

#[tokio::test]
async fn transport_failure_propagates_from_publish() {
    struct FailingTransport;

    #[async_trait::async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _message: &str, _topic_arn: &str) -> Result<(), TransportError> {
            Err(TransportError::Rejected("topic does not exist".to_string()))
        }
    }

    let router = EventRouter::new(FailingTransport, "42", "us-east-1", "prod");
    let err = router
        .publish(&Event::new("ORDER_CREATED", Map::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Transport(_)));
    assert!(err.to_string().contains("topic does not exist"));
}

#[tokio::test]
async fn concurrent_deliveries_are_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);
    let router = Arc::new(
        EventRouter::new(InMemoryTransport::new(), "42", "us-east-1", "prod").register(
            "PING",
            move |_| {
                let calls = Arc::clone(&handler_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
            },
        ),
    );

    let mut joins = Vec::new();
    for i in 0..8 {
        let router = Arc::clone(&router);
        joins.push(tokio::spawn(async move {
            let message = format!(r#"{{"NAME":"PING","seq":{}}}"#, i);
            let envelope = DeliveryEnvelope::wrap(message);
            router
                .handle_delivery(serde_json::to_value(&envelope).unwrap())
                .await
        }));
    }

    for join in joins {
        let response = join.await.unwrap();
        assert_eq!(response.status_code, 200);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 8);
}
