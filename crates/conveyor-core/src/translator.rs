//! Envelope translation.
//!
//! Translators normalize provider-specific envelopes into handler-ready
//! payloads. A single envelope may legitimately carry zero or more payloads;
//! fanning the extracted payloads out over `deliver` calls is the
//! scheduler's responsibility.
//!
//! Two standard translators are bundled:
//!
//! - [`SnsNotificationTranslator`]: the default. Understands the SNS
//!   notification document wrapping that queues subscribed to a topic
//!   receive.
//! - [`SqsBodyTranslator`]: for sources whose body *is* the payload.

use std::sync::Arc;

use serde_json::Value;

use crate::envelope::{Envelope, Payload};
use crate::error::{TranslateError, TranslateResult};

/// Converts one raw envelope into zero or more normalized payloads.
pub trait MessageTranslator: Send + Sync {
    /// Extracts the payloads carried by `envelope`.
    fn translate(&self, envelope: &Envelope) -> TranslateResult<Vec<Payload>>;
}

/// A boxed translator trait object.
pub type BoxedTranslator = Arc<dyn MessageTranslator>;

// =============================================================================
// SNS Notification Translator
// =============================================================================

/// Translator for SNS notification documents.
///
/// The envelope body is expected to be a JSON notification whose `Message`
/// field holds the published text. The text is parsed as JSON when possible
/// and passed through as a plain string otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsNotificationTranslator;

impl MessageTranslator for SnsNotificationTranslator {
    fn translate(&self, envelope: &Envelope) -> TranslateResult<Vec<Payload>> {
        let document: Value = serde_json::from_str(&envelope.body)?;
        let message = document
            .get("Message")
            .and_then(Value::as_str)
            .ok_or(TranslateError::MissingField { field: "Message" })?;

        Ok(vec![parse_or_text(message)])
    }
}

// =============================================================================
// SQS Body Translator
// =============================================================================

/// Translator for sources that deliver the payload directly in the body.
///
/// The body is parsed as JSON when possible and passed through as a plain
/// string otherwise. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqsBodyTranslator;

impl MessageTranslator for SqsBodyTranslator {
    fn translate(&self, envelope: &Envelope) -> TranslateResult<Vec<Payload>> {
        Ok(vec![parse_or_text(&envelope.body)])
    }
}

/// Parses `text` as JSON, falling back to a plain string payload.
fn parse_or_text(text: &str) -> Payload {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Payload::new(value),
        Err(_) => Payload::from(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(message: &str) -> Envelope {
        let body = json!({
            "Type": "Notification",
            "TopicArn": "arn:aws:sns:sa-east-1:0:orders",
            "Message": message,
        });
        Envelope::new(body.to_string()).with_message_id("m-1")
    }

    #[test]
    fn sns_extracts_json_message() {
        let envelope = notification(r#"{"order_id": 42}"#);
        let payloads = SnsNotificationTranslator.translate(&envelope).unwrap();

        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].value()["order_id"], 42);
    }

    #[test]
    fn sns_falls_back_to_plain_text() {
        let envelope = notification("not json at all");
        let payloads = SnsNotificationTranslator.translate(&envelope).unwrap();

        assert_eq!(payloads[0].as_text(), Some("not json at all"));
    }

    #[test]
    fn sns_rejects_malformed_body() {
        let envelope = Envelope::new("{{{");
        let err = SnsNotificationTranslator.translate(&envelope).unwrap_err();

        assert!(matches!(err, TranslateError::MalformedBody(_)));
    }

    #[test]
    fn sns_rejects_document_without_message() {
        let envelope = Envelope::new(r#"{"Type": "Notification"}"#);
        let err = SnsNotificationTranslator.translate(&envelope).unwrap_err();

        assert!(matches!(err, TranslateError::MissingField { field: "Message" }));
    }

    #[test]
    fn sqs_parses_json_body() {
        let envelope = Envelope::new(r#"{"order_id": 7}"#);
        let payloads = SqsBodyTranslator.translate(&envelope).unwrap();

        assert_eq!(payloads[0].value()["order_id"], 7);
    }

    #[test]
    fn sqs_passes_text_body_through() {
        let envelope = Envelope::new("plain text");
        let payloads = SqsBodyTranslator.translate(&envelope).unwrap();

        assert_eq!(payloads[0].as_text(), Some("plain text"));
    }
}
