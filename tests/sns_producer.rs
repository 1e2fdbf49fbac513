//! Tests for the SNS producer against a local HTTP endpoint.

use msgpub::{credentials::StaticCredentials, PublishError, Publisher};
use std::collections::HashMap;
use wiremock::matchers::method;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

mod helpers;
use helpers::{fast_orders_config, order_created};

/// Decodes an `application/x-www-form-urlencoded` component.
fn form_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn form_fields(body: &[u8]) -> HashMap<String, String> {
    String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (form_decode(k), form_decode(v)))
        .collect()
}

/// Matches a request whose form body carries a `String` message attribute
/// with the given name and value, in any entry slot.
struct StringAttribute {
    name: &'static str,
    value: &'static str,
}

impl Match for StringAttribute {
    fn matches(&self, request: &Request) -> bool {
        let fields = form_fields(&request.body);
        let field = |key: String| fields.get(&key).map(String::as_str);
        (1..=fields.len()).any(|n| {
            let entry = format!("MessageAttributes.entry.{}", n);
            field(format!("{}.Name", entry)) == Some(self.name)
                && field(format!("{}.Value.DataType", entry)) == Some("String")
                && field(format!("{}.Value.StringValue", entry)) == Some(self.value)
        })
    }
}

fn string_attribute(name: &'static str, value: &'static str) -> StringAttribute {
    StringAttribute { name, value }
}

#[tokio::test]
async fn test_each_attempt_is_one_request_with_event_attributes() {
    // Arrange
    let server = MockServer::start().await;
    // A mismatching attribute value must not be accepted by the matcher
    Mock::given(method("POST"))
        .and(string_attribute("eventSource", "billing-svc"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(string_attribute("eventSource", "orders-svc"))
        .and(string_attribute("eventType", "OrderCreated"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let config = fast_orders_config(2).with_endpoint(server.uri());
    let credentials = StaticCredentials::new("AKIDTEST", "test-secret");
    let publisher = Publisher::connect(config, &credentials).await.unwrap();

    // Act
    let result = publisher.publish(&order_created()).await;

    // Assert: the SDK does not retry on its own, so two attempts are two requests
    let err = result.unwrap_err();
    assert!(matches!(err, PublishError::Exhausted { attempts: 2, .. }));
    assert!(err.to_string().contains(&server.uri()));
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_exhausts_budget() {
    // Arrange: nothing listens on port 1
    let uri = "http://127.0.0.1:1".to_string();

    let config = fast_orders_config(3).with_endpoint(uri.clone());
    let credentials = StaticCredentials::new("AKIDTEST", "test-secret");
    let publisher = Publisher::connect(config, &credentials).await.unwrap();

    // Act
    let result = publisher.publish(&order_created()).await;

    // Assert
    match result {
        Err(PublishError::Exhausted { attempts, data, .. }) => {
            assert_eq!(attempts, 3);
            assert!(data.contains(&uri));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
}
