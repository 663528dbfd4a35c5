//! Publish transport trait and an in-memory implementation.
//!
//! The bridge consumes a transport; it never manages the transport's
//! credentials, retries, or connection lifecycle. Production code wraps an
//! SNS client; tests use [`InMemoryTransport`].

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// Error type for transport send operations.
///
/// The bridge treats this as opaque: it is wrapped into
/// `BridgeError::Transport` and surfaced to the caller unmodified.
#[derive(Debug)]
pub enum TransportError {
    /// Connection to the topic service failed
    ConnectionFailed(String),
    /// The topic service rejected the message
    Rejected(String),
    /// Timeout waiting for acknowledgment
    Timeout,
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Rejected(msg) => write!(f, "message rejected: {}", msg),
            TransportError::Timeout => write!(f, "send timeout"),
            TransportError::Other(e) => write!(f, "send error: {}", e),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Trait for sending a serialized message to a topic destination.
///
/// Implementations might include:
/// - `InMemoryTransport` - For testing and single-process scenarios
/// - An SNS client wrapper - For AWS deployments
/// - Any other topic service client with a publish call
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a serialized message to the given topic address.
    ///
    /// The bridge imposes no timeout or retry; any such policy belongs to
    /// the implementation or the caller.
    async fn send(&self, message: &str, topic_arn: &str) -> Result<(), TransportError>;
}

/// In-memory transport for testing and single-process scenarios.
///
/// Records every sent message in an append-only log. Thread-safe and
/// cheap to `Clone` (clones share the log).
///
/// ## Example
///
/// ```ignore
/// let transport = InMemoryTransport::new();
/// transport.send("{\"NAME\":\"PING\"}", "arn:aws:sns:...").await.unwrap();
/// assert_eq!(transport.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    /// Shared send log of (topic_arn, message) pairs
    log: Arc<Mutex<Vec<(String, String)>>>,
}

impl InMemoryTransport {
    /// Create a new in-memory transport with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all sent (topic_arn, message) pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().clone()
    }

    /// Get all messages sent to a specific topic, in send order.
    pub fn messages_for(&self, topic_arn: &str) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(arn, _)| arn == topic_arn)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    /// Get the most recently sent message, if any.
    pub fn last_message(&self) -> Option<String> {
        self.log.lock().unwrap().last().map(|(_, msg)| msg.clone())
    }

    /// Get the total number of sent messages.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Check if nothing has been sent.
    pub fn is_empty(&self) -> bool {
        self.log.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, message: &str, topic_arn: &str) -> Result<(), TransportError> {
        self.log
            .lock()
            .unwrap()
            .push((topic_arn.to_string(), message.to_string()));
        Ok(())
    }
}
