//! Event router — per-event-name handler registry, topic ARN derivation,
//! publish formatting, and inbound delivery dispatch.
//!
//! `EventRouter<T>` holds a transport and a set of named event handlers.
//! Each handler receives an [`Event`] and returns a future resolving to
//! `Result<Value, BridgeError>`.
//!
//! ## Example
//!
//! ```ignore
//! use serde_json::json;
//! use sns_bridge::{Event, EventRouter, InMemoryTransport};
//!
//! let router = EventRouter::new(InMemoryTransport::new(), "123456789012", "us-east-1", "prod")
//!     .register("ORDER_CREATED", |event| async move {
//!         // react to the order
//!         Ok(json!({ "handled": event.name }))
//!     });
//!
//! // Outbound
//! router.publish(&Event::new("ORDER_CREATED", body)).await?;
//!
//! // Inbound (platform-invoked)
//! let response = router.handle_delivery(delivery_json).await;
//! assert_eq!(response.status_code, 200);
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::envelope::{DeliveryEnvelope, DeliveryResponse};
use crate::error::BridgeError;
use crate::event::Event;
use crate::transport::Transport;

/// Future returned by a registered handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, BridgeError>> + Send>>;

/// A registered event handler, boxed for storage in the registry.
type BoxedHandler = Box<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

/// Routes named events between an application and a pub/sub topic service.
///
/// Generic over `T`, the publish transport. The registry is populated at
/// construction time and read-only afterwards, so an `Arc<EventRouter<T>>`
/// can serve concurrent deliveries without locking.
pub struct EventRouter<T: Transport> {
    transport: T,
    account_id: String,
    region: String,
    environment: String,
    handlers: HashMap<String, BoxedHandler>,
}

impl<T: Transport> EventRouter<T> {
    /// Create a new router.
    ///
    /// `environment` labels the deployment (e.g. "prod", "staging") and is
    /// upper-cased into the topic ARN suffix. It may be empty.
    pub fn new(
        transport: T,
        account_id: impl Into<String>,
        region: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            account_id: account_id.into(),
            region: region.into(),
            environment: environment.into(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for an event name.
    ///
    /// Uses builder pattern — returns `self` for chaining. Re-registering
    /// a name silently replaces the previous handler (last write wins).
    /// `name` is expected to be non-empty; this is not enforced.
    pub fn register<F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BridgeError>> + Send + 'static,
    {
        self.handlers
            .insert(name.into(), Box::new(move |event| Box::pin(handler(event))));
        self
    }

    /// List registered event names.
    pub fn registered(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }

    /// The topic ARN for an event name.
    ///
    /// Deterministic:
    /// `arn:aws:sns:{region}:{account_id}:E_{name}_{ENVIRONMENT}` with the
    /// environment upper-cased. An empty environment leaves a trailing
    /// underscore; callers that provision topics must match this exactly.
    pub fn topic_arn(&self, event_name: &str) -> String {
        format!(
            "arn:aws:sns:{}:{}:E_{}_{}",
            self.region,
            self.account_id,
            event_name,
            self.environment.to_uppercase()
        )
    }

    /// Publish an event to its topic.
    ///
    /// Serializes the event's wire form and delegates to the transport.
    /// No retry, timeout, or local recovery: transport failures come back
    /// as `BridgeError::Transport`, unmodified.
    pub async fn publish(&self, event: &Event) -> Result<(), BridgeError> {
        let message = event.to_json();
        let topic_arn = self.topic_arn(&event.name);
        self.transport.send(&message, &topic_arn).await?;
        Ok(())
    }

    /// Dispatch a structured event to its registered handler.
    ///
    /// Errors propagate to the caller; this path does no catch-all. Use
    /// [`handle_delivery`](Self::handle_delivery) at the platform boundary.
    pub async fn dispatch(&self, event: Event) -> Result<Value, BridgeError> {
        let handler = self
            .handlers
            .get(&event.name)
            .ok_or_else(|| BridgeError::Dispatch(event.name.clone()))?;
        handler(event).await
    }

    /// Validate a raw JSON value as an event, then dispatch it.
    ///
    /// Shape violations (non-object event, non-string `NAME`) surface as
    /// `BridgeError::Validation` before any handler runs.
    pub async fn dispatch_value(&self, value: Value) -> Result<Value, BridgeError> {
        let event = Event::from_value(value)?;
        self.dispatch(event).await
    }

    /// Dispatch the event embedded in a context object.
    ///
    /// Context-driven variant for direct in-process invocations: the
    /// context carries the event under an `EVENT` field. Errors propagate
    /// to the caller.
    pub async fn dispatch_context(&self, mut context: Value) -> Result<Value, BridgeError> {
        let event = match context.get_mut("EVENT") {
            Some(value) => value.take(),
            None => {
                return Err(BridgeError::Validation {
                    parameter: "context.EVENT",
                    expected: "object",
                    actual: "missing".to_string(),
                })
            }
        };
        self.dispatch_value(event).await
    }

    /// Handle an inbound pub/sub delivery.
    ///
    /// This is the outermost boundary visible to the invoking platform:
    /// every failure (envelope decode, event validation, missing handler,
    /// handler error) is converted into a 500 response. No error escapes.
    pub async fn handle_delivery(&self, delivery: Value) -> DeliveryResponse {
        match self.route_delivery(delivery).await {
            Ok(_) => DeliveryResponse::ok(),
            Err(e) => DeliveryResponse::failure(&e),
        }
    }

    /// Decode a delivery envelope down to its event and dispatch it.
    async fn route_delivery(&self, delivery: Value) -> Result<Value, BridgeError> {
        let envelope: DeliveryEnvelope = serde_json::from_value(delivery)?;
        let event = Event::from_json(envelope.first_message()?)?;
        self.dispatch(event).await
    }
}
