//! The event type exchanged between producers and handlers.
//!
//! On the wire an event is a single JSON object: the body fields plus a
//! top-level `"NAME"` string field. Parsing strips `NAME` out of the body;
//! serializing puts it back. Handlers therefore see exactly the body that
//! was published.

use serde_json::{Map, Value};

use crate::error::BridgeError;

/// Wire field carrying the event name.
pub const NAME_FIELD: &str = "NAME";

/// A named, structured event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name (e.g., "ORDER_CREATED", "PAYMENT_SUCCEEDED")
    pub name: String,
    /// Event body as a JSON object, without the `NAME` field
    pub body: Map<String, Value>,
}

impl Event {
    /// Create a new event with the given name and body.
    pub fn new(name: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Build an event from a raw JSON value, validating its shape.
    ///
    /// The value must be a JSON object carrying a string `NAME` field.
    /// Anything else is a `BridgeError::Validation` naming the offending
    /// parameter and its actual JSON type.
    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        let mut body = match value {
            Value::Object(map) => map,
            other => {
                return Err(BridgeError::Validation {
                    parameter: "event",
                    expected: "object",
                    actual: json_type_name(&other).to_string(),
                })
            }
        };

        let name = match body.remove(NAME_FIELD) {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(BridgeError::Validation {
                    parameter: "event.NAME",
                    expected: "string",
                    actual: json_type_name(&other).to_string(),
                })
            }
            None => {
                return Err(BridgeError::Validation {
                    parameter: "event.NAME",
                    expected: "string",
                    actual: "missing".to_string(),
                })
            }
        };

        Ok(Self { name, body })
    }

    /// Parse an event from JSON text.
    ///
    /// Invalid JSON is a `BridgeError::Decode`; valid JSON with the wrong
    /// shape is a `BridgeError::Validation`.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// The wire form of this event: the body with `NAME` inserted.
    pub fn to_value(&self) -> Value {
        let mut wire = self.body.clone();
        wire.insert(NAME_FIELD.to_string(), Value::String(self.name.clone()));
        Value::Object(wire)
    }

    /// Serialize the wire form to JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Get a body field by key.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }
}

/// Name of a JSON value's type, for validation error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_name_out_of_the_body() {
        let event = Event::from_value(json!({
            "NAME": "ORDER_CREATED",
            "order_id": "o-1",
            "total": 42
        }))
        .unwrap();

        assert_eq!(event.name, "ORDER_CREATED");
        assert_eq!(event.get("order_id"), Some(&json!("o-1")));
        assert!(event.get(NAME_FIELD).is_none());
    }

    #[test]
    fn wire_form_round_trips() {
        let body = json!({ "order_id": "o-1", "items": [{"sku": "A"}] });
        let Value::Object(map) = body else { unreachable!() };
        let event = Event::new("ORDER_CREATED", map.clone());

        let parsed = Event::from_json(&event.to_json()).unwrap();
        assert_eq!(parsed.name, "ORDER_CREATED");
        assert_eq!(parsed.body, map);
    }

    #[test]
    fn non_object_event_fails_validation() {
        let err = Event::from_value(json!("a string")).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Validation {
                parameter: "event",
                expected: "object",
                ref actual,
            } if actual == "string"
        ));

        let err = Event::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, BridgeError::Validation { ref actual, .. } if actual == "array"));
    }

    #[test]
    fn non_string_name_fails_validation() {
        let err = Event::from_value(json!({ "NAME": 123 })).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Validation {
                parameter: "event.NAME",
                expected: "string",
                ref actual,
            } if actual == "number"
        ));
    }

    #[test]
    fn missing_name_fails_validation() {
        let err = Event::from_value(json!({ "order_id": "o-1" })).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Validation { parameter: "event.NAME", ref actual, .. } if actual == "missing"
        ));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = Event::from_json("{not json").unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }
}
