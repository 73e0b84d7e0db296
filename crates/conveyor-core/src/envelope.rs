//! Raw envelopes and normalized payloads.
//!
//! An [`Envelope`] is the message exactly as the polling side received it
//! from the provider: opaque body plus provider metadata. A [`Payload`] is
//! what a translator extracted from it and what handlers consume.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Envelope
// =============================================================================

/// A raw provider message, prior to translation.
///
/// The routing core never interprets the body itself; that is the
/// translator's job. The receipt handle is carried for the scheduler, which
/// needs it to acknowledge the message at the source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Provider-assigned message ID, if any.
    pub message_id: Option<String>,

    /// Opaque token the scheduler presents to acknowledge the message.
    pub receipt_handle: Option<String>,

    /// The raw message body.
    pub body: String,

    /// Provider message attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Envelope {
    /// Creates an envelope with the given body and no metadata.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Sets the provider message ID.
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Sets the receipt handle.
    pub fn with_receipt_handle(mut self, handle: impl Into<String>) -> Self {
        self.receipt_handle = Some(handle.into());
        self
    }

    /// Adds a message attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message_id {
            Some(id) => write!(f, "message {id}"),
            None => write!(f, "message <no id>"),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// A normalized message payload, ready for a handler.
///
/// Wraps a JSON value so translators can hand over structured documents and
/// plain text through the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Payload {
    /// Creates a payload from a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the payload as text, if it is a plain string.
    pub fn as_text(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Returns the underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self(Value::String(text.to_string()))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self(Value::String(text))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_str() {
            Some(text) => f.write_str(text),
            None => write!(f, "{}", self.0),
        }
    }
}
