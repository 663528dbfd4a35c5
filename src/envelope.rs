//! Wire types for inbound SNS deliveries and the boundary response.
//!
//! An inbound delivery is the Lambda-style envelope:
//!
//! ```json
//! {
//!   "Records": [
//!     { "Sns": { "Message": "{\"NAME\":\"ORDER_CREATED\",...}" } }
//!   ]
//! }
//! ```
//!
//! Exactly one embedded message is expected; only the first record is read.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// The delivery envelope wrapping one or more serialized events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// Ordered delivery records; only the first is consumed.
    #[serde(rename = "Records")]
    pub records: Vec<DeliveryRecord>,
}

/// One record inside a delivery envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// The nested SNS payload.
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

/// The SNS payload carrying the serialized event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsMessage {
    /// JSON text of the event.
    #[serde(rename = "Message")]
    pub message: String,
}

impl DeliveryEnvelope {
    /// Wrap a serialized event in a single-record envelope.
    ///
    /// Mirrors what the platform delivers; used to build synthetic
    /// deliveries in tests and local harnesses.
    pub fn wrap(message: impl Into<String>) -> Self {
        Self {
            records: vec![DeliveryRecord {
                sns: SnsMessage {
                    message: message.into(),
                },
            }],
        }
    }

    /// The embedded message of the first record.
    ///
    /// An envelope with no records is a decode error: the platform contract
    /// is exactly one embedded message per delivery.
    pub fn first_message(&self) -> Result<&str, BridgeError> {
        self.records
            .first()
            .map(|record| record.sns.message.as_str())
            .ok_or_else(|| BridgeError::Decode("delivery envelope has no records".to_string()))
    }
}

/// HTTP-style response returned from the delivery boundary.
///
/// Serializes as `{"statusCode": 200}` on success and
/// `{"statusCode": 500, "body": "<json error>"}` on failure. No other
/// status codes are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResponse {
    /// HTTP-style status code: 200 or 500.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON text describing the failure; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl DeliveryResponse {
    /// The success response.
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: None,
        }
    }

    /// A failure response carrying the error as JSON text.
    pub fn failure(err: &BridgeError) -> Self {
        Self {
            status_code: err.status_code(),
            body: Some(serde_json::json!({ "error": err.to_string() }).to_string()),
        }
    }

    /// Whether this is the success response.
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}
