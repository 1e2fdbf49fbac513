#![allow(dead_code)]
//! Shared fixtures for integration tests.

use msgpub::{MessagingConfig, NotificationPayload, RetryConfig};
use serde_json::{json, Map};

pub const ORDERS_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:orders";

/// The publisher configuration used across the scenarios.
pub fn orders_config() -> MessagingConfig {
    MessagingConfig::new("us-east-1", ORDERS_TOPIC_ARN, "orders-svc")
}

/// Same as [`orders_config`] but with a short backoff for real-time tests.
pub fn fast_orders_config(max_attempts: u32) -> MessagingConfig {
    orders_config().with_retry(RetryConfig {
        max_attempts,
        backoff_ms: 10,
    })
}

/// A notification of the given kind carrying `{"id": id}`.
pub fn notification(event_type: &str, id: u64, correlation_id: &str) -> NotificationPayload {
    let mut data = Map::new();
    data.insert("id".to_string(), json!(id));
    NotificationPayload::new(event_type, data, correlation_id)
}

/// `{type:"OrderCreated", data:{id:42}, correlationId:"abc-1"}`
pub fn order_created() -> NotificationPayload {
    notification("OrderCreated", 42, "abc-1")
}
