//! Core domain types and service traits for msgpub
//!
//! This module defines the notification payload accepted from callers, the
//! envelope placed on the wire, and the trait contract for the outbound
//! message producer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Message attribute carrying the publisher's source tag.
pub const EVENT_SOURCE_ATTRIBUTE: &str = "eventSource";
/// Message attribute carrying the event kind.
pub const EVENT_TYPE_ATTRIBUTE: &str = "eventType";

/// Envelope version used when the caller does not supply one.
pub const DEFAULT_EVENT_VERSION: u32 = 1;

/// An application-level notification, as supplied by the caller.
///
/// `data` is schema-less. Nothing beyond structural deserialization is
/// checked; a malformed payload is passed through to the transport as-is,
/// and fields the caller left out stay absent in the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Event kind, e.g. `OrderCreated`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Business content of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Opaque tracing identifier, propagated unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Envelope version; defaults to 1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl NotificationPayload {
    /// Creates a payload with no explicit version.
    pub fn new(
        event_type: impl Into<String>,
        data: Map<String, Value>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            event_type: Some(event_type.into()),
            data: Some(data),
            correlation_id: Some(correlation_id.into()),
            version: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
}

/// The versioned, timestamped envelope serialized as the message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// ISO 8601 UTC timestamp of envelope construction
    pub created: String,
    /// Source tag of the publishing service
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub version: u32,
}

/// A fully prepared message, ready to be handed to a producer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub topic_arn: String,
    pub body: String,
    /// String-typed message attributes.
    pub attributes: BTreeMap<String, String>,
}

impl OutboundMessage {
    /// Returns the value of a message attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A failed send at the transport level.
///
/// All transport failures (network, authorization, malformed topic) share
/// this one shape; the retry loop does not tell them apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProducerError {
    #[error("{0}")]
    Send(String),
}

/// Trait for the outbound pub/sub producer.
#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Sends one message and returns the transport-assigned message id.
    async fn send(&self, message: &OutboundMessage) -> Result<String, ProducerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_deserializes_with_missing_optional_fields() {
        let payload: NotificationPayload =
            serde_json::from_value(json!({ "type": "OrderCreated", "data": { "id": 42 } })).unwrap();

        assert_eq!(payload.event_type.as_deref(), Some("OrderCreated"));
        assert_eq!(payload.data.unwrap().get("id"), Some(&json!(42)));
        assert_eq!(payload.correlation_id, None);
        assert_eq!(payload.version, None);
    }

    #[test]
    fn payload_without_type_or_data_keeps_them_absent() {
        let payload: NotificationPayload =
            serde_json::from_value(json!({ "correlationId": "x" })).unwrap();

        assert_eq!(payload.event_type, None);
        assert_eq!(payload.data, None);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "correlationId": "x" }));
    }

    #[test]
    fn payload_uses_camel_case_on_the_wire() {
        let payload = NotificationPayload::new("OrderCreated", Map::new(), "abc-1").with_version(3);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["type"], "OrderCreated");
        assert_eq!(value["correlationId"], "abc-1");
        assert_eq!(value["version"], 3);
    }
}
