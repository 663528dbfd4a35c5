//! SNS Bridge - named-event pub/sub adapter
//!
//! This crate routes named events between an application and an SNS-style
//! topic service: outgoing events are serialized and addressed to a
//! per-event topic ARN; inbound deliveries are unwrapped, validated, and
//! dispatched to the handler registered for the event's name.
//!
//! ## Architecture
//!
//! ```text
//! publish(event)                         handle_delivery(envelope)
//!      │                                          │
//!      ▼                                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      EventRouter<T>                          │
//! │  - topic ARN derivation (region/account/env + event name)    │
//! │  - handler registry: event name → async handler              │
//! │  - delivery boundary: all failures → {statusCode: 500}       │
//! └──────────────────────────────────────────────────────────────┘
//!      │                                          │
//!      ▼                                          ▼
//! ┌─────────────────┐                    ┌──────────────────────┐
//! │ Transport trait │                    │ registered handlers  │
//! │ send(msg, arn)  │                    │ Fn(Event) -> Future  │
//! └─────────────────┘                    └──────────────────────┘
//! ```
//!
//! The transport is an external collaborator: the bridge formats and
//! delegates, and never retries, times out, or inspects transport errors.

mod envelope;
mod error;
mod event;
mod router;
mod transport;

pub use envelope::{DeliveryEnvelope, DeliveryRecord, DeliveryResponse, SnsMessage};
pub use error::BridgeError;
pub use event::{Event, NAME_FIELD};
pub use router::{EventRouter, HandlerFuture};
pub use transport::{InMemoryTransport, Transport, TransportError};
