//! Error types for event routing and delivery handling.

use std::error::Error;
use std::fmt;

use crate::transport::TransportError;

/// Error type for bridge operations.
#[derive(Debug)]
pub enum BridgeError {
    /// An event failed shape validation (wrong JSON type for a field).
    Validation {
        /// The parameter that failed validation (e.g. `"event"`, `"event.NAME"`).
        parameter: &'static str,
        /// The JSON type that was expected.
        expected: &'static str,
        /// The JSON type that was actually found.
        actual: String,
    },
    /// No handler registered for this event name.
    Dispatch(String),
    /// An inbound envelope or embedded message could not be parsed.
    Decode(String),
    /// The publish transport failed; carried through unmodified.
    Transport(TransportError),
    /// A registered handler failed.
    Handler(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Validation {
                parameter,
                expected,
                actual,
            } => write!(
                f,
                "invalid {}: expected {}, got {}",
                parameter, expected, actual
            ),
            BridgeError::Dispatch(name) => {
                write!(f, "no handler registered for event: {}", name)
            }
            BridgeError::Decode(msg) => write!(f, "decode failed: {}", msg),
            BridgeError::Transport(e) => write!(f, "transport error: {}", e),
            BridgeError::Handler(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BridgeError::Transport(e) => Some(e),
            BridgeError::Handler(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Decode(err.to_string())
    }
}

impl From<TransportError> for BridgeError {
    fn from(err: TransportError) -> Self {
        BridgeError::Transport(err)
    }
}

impl BridgeError {
    /// Wrap an application-level handler failure.
    ///
    /// Convenience for handlers that fail with a plain message rather than
    /// a concrete error type.
    pub fn handler(msg: impl Into<String>) -> Self {
        BridgeError::Handler(msg.into().into())
    }

    /// Map this error to an HTTP-style status code.
    ///
    /// The delivery boundary emits only 200 or 500, so every error kind
    /// maps to 500.
    pub fn status_code(&self) -> u16 {
        500
    }
}
